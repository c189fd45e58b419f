// Resume field extraction: text extractor, field matchers, entity grouper and
// the submission pipeline that ties them to the result store.

pub mod grouper;
pub mod handlers;
pub mod matchers;
pub mod pipeline;
pub mod text;

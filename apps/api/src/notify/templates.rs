use crate::notify::Decision;

pub const DEFAULT_CANDIDATE_NAME: &str = "Candidate";

/// A rendered decision email.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub subject: &'static str,
    pub html_body: String,
    /// One-line summary used when the message is only logged.
    pub preview: &'static str,
}

pub fn render(decision: Decision, candidate_name: &str, sender_name: &str) -> EmailMessage {
    let name = display_name(candidate_name);
    match decision {
        Decision::Accepted => EmailMessage {
            subject: "Congratulations! Interview Invitation",
            html_body: accepted_body(name, sender_name),
            preview: "We were impressed with your resume and would like to schedule an interview.",
        },
        Decision::Rejected => EmailMessage {
            subject: "Application Status Update",
            html_body: rejected_body(name, sender_name),
            preview: "Thank you for your interest. We've decided to move forward with other candidates.",
        },
    }
}

fn display_name(candidate_name: &str) -> &str {
    let trimmed = candidate_name.trim();
    if trimmed.is_empty() {
        DEFAULT_CANDIDATE_NAME
    } else {
        trimmed
    }
}

fn accepted_body(name: &str, sender_name: &str) -> String {
    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2 style="color: #6a11cb;">Congratulations, {name}!</h2>
      <p>We are pleased to inform you that after reviewing your resume, we would like to invite you for an interview.</p>
      <p><strong>Your profile has impressed our team, and we believe you would be a great fit for our organization.</strong></p>
      <div style="background-color: #f4f7f6; padding: 15px; border-radius: 8px; margin: 20px 0;">
        <h3 style="margin-top: 0; color: #2575fc;">Next Steps:</h3>
        <ul>
          <li>Our HR team will contact you shortly to schedule the interview</li>
          <li>Please prepare for both technical and HR rounds</li>
          <li>Keep your resume and relevant documents ready</li>
        </ul>
      </div>
      <p>We look forward to meeting you!</p>
      <p style="margin-top: 30px;">Best regards,<br><strong>{sender_name}</strong></p>
    </div>
  </body>
</html>"#,
        name = escape_html(name),
        sender_name = escape_html(sender_name),
    )
}

fn rejected_body(name: &str, sender_name: &str) -> String {
    format!(
        r#"<html>
  <body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
      <h2 style="color: #6a11cb;">Thank You for Your Application</h2>
      <p>Dear {name},</p>
      <p>Thank you for taking the time to apply and for your interest in our organization.</p>
      <p>After careful consideration of your application, we regret to inform you that we have decided to move forward with other candidates whose profiles more closely match our current requirements.</p>
      <div style="background-color: #f4f7f6; padding: 15px; border-radius: 8px; margin: 20px 0;">
        <p style="margin: 0;"><strong>We encourage you to:</strong></p>
        <ul style="margin-top: 10px;">
          <li>Keep an eye on our careers page for future opportunities</li>
          <li>Connect with us on LinkedIn for updates</li>
          <li>Continue building your skills and experience</li>
        </ul>
      </div>
      <p>We wish you all the best in your career journey.</p>
      <p style="margin-top: 30px;">Best regards,<br><strong>{sender_name}</strong></p>
    </div>
  </body>
</html>"#,
        name = escape_html(name),
        sender_name = escape_html(sender_name),
    )
}

/// Candidate names come from uploaded documents.
fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

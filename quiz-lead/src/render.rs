//! Email bodies and subjects for the two notification audiences

use crate::{lead::LeadRecord, normalize::NormalizedContent};

/// Link used when no consultation booking page is configured
pub const DEFAULT_CONSULTATION_URL: &str = "https://calendly.com/your-consultation";
/// Signature used when no coach name is configured
pub const DEFAULT_COACH_NAME: &str = "[Your Name]";

/// Subject and bodies of one notification, not yet addressed
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmail {
    /// Subject line
    pub subject: String,
    /// HTML body, if the message has one
    pub html: Option<String>,
    /// Plain-text body
    pub text: String,
}

/// Both notifications for one lead
#[derive(Debug, Clone, PartialEq)]
pub struct Notifications {
    /// Study-plan confirmation for the submitter
    pub user: RenderedEmail,
    /// New-lead alert for the administrator
    pub admin: RenderedEmail,
}

/// Renders the confirmation and alert emails.
///
/// Holds only the per-deployment text (booking link and signature), so one
/// renderer serves every invocation.
#[derive(Debug, Clone)]
pub struct Renderer {
    consultation_url: String,
    coach_name: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::new(DEFAULT_CONSULTATION_URL, DEFAULT_COACH_NAME)
    }
}

fn or_empty(value: Option<&str>) -> &str {
    value.unwrap_or_default()
}

/// Escape `value` for use in HTML text and quoted attribute values
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

impl Renderer {
    /// Create a renderer with the given booking link and signature
    pub fn new(consultation_url: impl Into<String>, coach_name: impl Into<String>) -> Self {
        Renderer {
            consultation_url: consultation_url.into(),
            coach_name: coach_name.into(),
        }
    }

    /// Render both notifications for `record`
    pub fn render(&self, record: &LeadRecord, content: &NormalizedContent<'_>) -> Notifications {
        Notifications {
            user: RenderedEmail {
                subject: self.user_subject(record),
                html: Some(self.user_html(record, content)),
                text: self.user_text(record, content),
            },
            admin: RenderedEmail {
                subject: self.admin_subject(record),
                html: None,
                text: self.admin_text(record),
            },
        }
    }

    /// Subject of the user confirmation
    pub fn user_subject(&self, record: &LeadRecord) -> String {
        format!(
            "Your Personalized IELTS Study Plan is Ready, {}! 📚",
            record.first_name()
        )
    }

    /// Subject of the admin alert
    pub fn admin_subject(&self, record: &LeadRecord) -> String {
        format!("New IELTS Quiz Lead - {}", record.first_name())
    }

    /// HTML body of the user confirmation. Submitted values are escaped.
    pub fn user_html(&self, record: &LeadRecord, content: &NormalizedContent<'_>) -> String {
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Your IELTS Study Plan</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
    .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #667eea, #764ba2); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
    .content {{ background: #f9f9f9; padding: 30px; border-radius: 0 0 10px 10px; }}
    .cta-button {{ background: #667eea; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; display: inline-block; margin: 20px 0; }}
    .highlight {{ background: #fff3cd; padding: 15px; border-radius: 5px; margin: 20px 0; }}
    .highlight li {{ font-weight: bold; }}
  </style>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Your Personalized IELTS Study Plan is Ready! 🎉</h1>
    </div>
    <div class="content">
      <p>Hi {first_name},</p>

      <p>Congratulations on taking the first step toward your IELTS success!</p>

      <div class="highlight">
        <h3>📊 Your Assessment Results:</h3>
        <ul>
          <li>Target Band: {target_band}</li>
          <li>Timeline: {timeline}</li>
          <li>Weak Section: {weak_section}</li>
          <li>Study Time: {study_time}</li>
          <li>Biggest Challenge: {challenge}</li>
        </ul>
      </div>

      <p>I've created a personalized study plan specifically for your situation. This isn't just another generic guide—it's tailored to help you reach Band {target_band} efficiently.</p>

      <p><strong>What you'll find in your study plan:</strong></p>
      <ul>
        <li>Week-by-week roadmap for your {timeline_lower} timeline</li>
        <li>Focus on improving your {weak_section} section</li>
        <li>Daily study schedule that fits your {study_time_lower} availability</li>
        <li>Common mistakes to avoid (especially relevant to your situation)</li>
        <li>Bonus prep checklist to get started immediately</li>
      </ul>

      <p><strong>Quick Win for This Week:</strong></p>
      <p>Since you mentioned {challenge} as your biggest obstacle, here's your first action step: Focus on building a strong foundation in {weak_section} with 30 minutes of daily practice. This single change will make a noticeable difference in your practice tests within 7 days.</p>

      <p><strong>Ready to take the next step?</strong></p>
      <p>I'm offering a free 15-minute consultation to help you get started with your study plan. We'll discuss your specific challenges and create an action plan for the next few weeks.</p>

      <a href="{consultation_url}" class="cta-button">Book Your Free Consultation</a>

      <p>Questions about your study plan? Just reply to this email—I read every response personally.</p>

      <p>To your IELTS success,<br>
      {coach_name}<br>
      IELTS Success Coach</p>
    </div>
  </div>
</body>
</html>
"#,
            first_name = escape_html(record.first_name()),
            target_band = escape_html(or_empty(content.target_band())),
            timeline = escape_html(content.timeline()),
            timeline_lower = escape_html(&content.timeline().to_lowercase()),
            weak_section = escape_html(or_empty(content.weak_section())),
            study_time = escape_html(content.study_time()),
            study_time_lower = escape_html(&content.study_time().to_lowercase()),
            challenge = escape_html(or_empty(content.challenge())),
            consultation_url = escape_html(&self.consultation_url),
            coach_name = escape_html(&self.coach_name),
        )
    }

    /// Plain-text body of the user confirmation
    pub fn user_text(&self, record: &LeadRecord, content: &NormalizedContent<'_>) -> String {
        format!(
            "Hi {first_name},

Your Personalized IELTS Study Plan is Ready! 🎉

Congratulations on taking the first step toward your IELTS success!

Your Assessment Results:
- Target Band: {target_band}
- Timeline: {timeline}
- Weak Section: {weak_section}
- Study Time: {study_time}
- Biggest Challenge: {challenge}

I've created a personalized study plan specifically for your situation. This isn't just another generic guide—it's tailored to help you reach Band {target_band} efficiently.

What you'll find in your study plan:
- Week-by-week roadmap for your {timeline_lower} timeline
- Focus on improving your {weak_section} section
- Daily study schedule that fits your {study_time_lower} availability
- Common mistakes to avoid (especially relevant to your situation)
- Bonus prep checklist to get started immediately

Quick Win for This Week:
Since you mentioned {challenge} as your biggest obstacle, here's your first action step: Focus on building a strong foundation in {weak_section} with 30 minutes of daily practice. This single change will make a noticeable difference in your practice tests within 7 days.

Ready to take the next step?
I'm offering a free 15-minute consultation to help you get started with your study plan. We'll discuss your specific challenges and create an action plan for the next few weeks.

Book your consultation: {consultation_url}

Questions about your study plan? Just reply to this email—I read every response personally.

To your IELTS success,
{coach_name}
IELTS Success Coach
",
            first_name = escape_html(record.first_name()),
            target_band = escape_html(or_empty(content.target_band())),
            timeline = escape_html(content.timeline()),
            timeline_lower = escape_html(&content.timeline().to_lowercase()),
            weak_section = escape_html(or_empty(content.weak_section())),
            study_time = escape_html(content.study_time()),
            study_time_lower = escape_html(&content.study_time().to_lowercase()),
            challenge = escape_html(or_empty(content.challenge())),
            consultation_url = escape_html(&self.consultation_url),
            coach_name = escape_html(&self.coach_name),
        )
    }

    /// Plain-text body of the admin alert. Reports the raw timeline code.
    pub fn admin_text(&self, record: &LeadRecord) -> String {
        format!(
            "New IELTS Quiz Lead:
Name: {}
Email: {}
Target Band: {}
Timeline: {}
Weak Section: {}
Challenge: {}
Timestamp: {}",
            record.first_name(),
            record.email(),
            or_empty(record.target_band()),
            or_empty(record.timeline()),
            or_empty(record.weak_section()),
            or_empty(record.challenge()),
            record.timestamp_iso(),
        )
    }
}

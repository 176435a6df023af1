//! Moodle notification payload and its conversion into a chat post.

use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use crate::platform::{Post, PostProps, SlackAttachment};
use crate::utils::markdown::{normalize_html_entities, replace_embedded_images};

/// Attachment title used when the notification has no subject
pub const DEFAULT_SUBJECT: &str = "Moodle Notification";

/// Accent color of the notification attachment
pub const ATTACHMENT_COLOR: &str = "#FF8000";

/// Notification pushed by Moodle to the webhook.
///
/// Unknown fields are ignored; missing or `null` fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_has_body"))]
pub struct Notification {
    /// Email of the recipient
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,

    /// Plain text message
    #[serde(default, deserialize_with = "null_as_empty")]
    pub message: String,

    /// HTML version of the message
    #[serde(default, rename = "messageHTML", deserialize_with = "null_as_empty")]
    pub message_html: String,

    /// Notification subject
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subject: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn validate_has_body(notification: &Notification) -> Result<(), ValidationError> {
    if notification.message.is_empty() && notification.message_html.is_empty() {
        return Err(ValidationError::new("missing_body")
            .with_message("message or messageHTML is required".into()));
    }
    Ok(())
}

impl Notification {
    /// Decodes a notification from a JSON request body
    pub fn from_json(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    /// Attachment title: the subject, or [`DEFAULT_SUBJECT`] when blank
    pub fn title(&self) -> &str {
        if self.subject.trim().is_empty() {
            DEFAULT_SUBJECT
        } else {
            &self.subject
        }
    }

    /// Renders the notification body as chat-safe markdown.
    ///
    /// The HTML body is converted to markdown; when it is empty, fails to
    /// convert or converts to nothing, the plain message is used instead.
    /// Embedded images are then turned into links and entities spaced out.
    pub fn body_markdown(&self) -> String {
        let converted = if self.message_html.is_empty() {
            String::new()
        } else {
            htmd::convert(&self.message_html).unwrap_or_default()
        };

        let text = if converted.trim().is_empty() {
            self.message.as_str()
        } else {
            converted.as_str()
        };

        normalize_html_entities(&replace_embedded_images(text))
    }

    /// Builds the direct-message post sent by the bot.
    ///
    /// The content travels in a single attachment so the chat client renders
    /// the subject as a title with the Moodle accent color.
    pub fn to_post(&self, bot_id: &str, channel_id: &str) -> Post {
        Post {
            id: String::new(),
            user_id: bot_id.to_string(),
            channel_id: channel_id.to_string(),
            message: String::new(),
            props: PostProps {
                attachments: vec![SlackAttachment {
                    title: self.title().to_string(),
                    color: ATTACHMENT_COLOR.to_string(),
                    text: self.body_markdown(),
                }],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn notification(message: &str, html: &str) -> Notification {
        Notification {
            email: "student@example.com".to_string(),
            message: message.to_string(),
            message_html: html.to_string(),
            subject: String::new(),
        }
    }

    fn attachment_text(post: &Post) -> &str {
        &post.props.attachments[0].text
    }

    #[test]
    fn test_from_json_full_payload() {
        let body = br#"{"email":"u@x.com","message":"hi","messageHTML":"<p>hi</p>","subject":"Quiz","courseid":7}"#;
        let n = Notification::from_json(body).unwrap();
        assert_eq!(n.email, "u@x.com");
        assert_eq!(n.message, "hi");
        assert_eq!(n.message_html, "<p>hi</p>");
        assert_eq!(n.subject, "Quiz");
    }

    #[test]
    fn test_from_json_missing_and_null_fields_default_to_empty() {
        let n = Notification::from_json(br#"{"email":"u@x.com","subject":null}"#).unwrap();
        assert_eq!(n.message, "");
        assert_eq!(n.message_html, "");
        assert_eq!(n.subject, "");
    }

    #[test]
    fn test_from_json_rejects_malformed_body() {
        assert!(Notification::from_json(b"not json").is_err());
        assert!(Notification::from_json(b"[1,2]").is_err());
        assert!(Notification::from_json(b"").is_err());
    }

    #[test]
    fn test_validation_requires_email() {
        let mut n = notification("hi", "");
        n.email.clear();
        let errors = n.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_validation_requires_some_body() {
        assert!(notification("", "").validate().is_err());
        assert!(notification("hi", "").validate().is_ok());
        assert!(notification("", "<p>hi</p>").validate().is_ok());
    }

    #[test]
    fn test_plain_message_used_without_html() {
        let post = notification("Your quiz was graded", "").to_post("bot", "chan");
        assert_eq!(attachment_text(&post), "Your quiz was graded");
    }

    #[test]
    fn test_html_takes_precedence_over_message() {
        let post = notification(
            "plain fallback",
            r#"<p>Hello <strong>world</strong>, see <a href="https://lms.example.com/course">the course</a></p>"#,
        )
        .to_post("bot", "chan");
        let text = attachment_text(&post);
        assert!(!text.contains("plain fallback"));
        assert!(!text.contains("<strong>"));
        assert!(text.contains("world"));
        assert!(text.contains("[the course](https://lms.example.com/course)"));
    }

    #[test]
    fn test_html_converting_to_nothing_falls_back() {
        let post = notification("fallback", "<div></div>").to_post("bot", "chan");
        assert_eq!(attachment_text(&post), "fallback");
    }

    #[test]
    fn test_embedded_html_image_becomes_link() {
        let post = notification(
            "",
            r#"<p><img src="https://lms.example.com/pluginfile.php/1/a.png" alt="diagram"></p>"#,
        )
        .to_post("bot", "chan");
        assert!(
            attachment_text(&post)
                .contains(r"[\[diagram\]](https://lms.example.com/pluginfile.php/1/a.png)")
        );
    }

    #[test]
    fn test_plain_message_is_normalized() {
        let post = notification("see ![](http:example.com/x.png)", "").to_post("bot", "chan");
        assert_eq!(
            attachment_text(&post),
            r"see [\[view image\]](http:example.com/x.png)"
        );
    }

    #[test]
    fn test_post_shape() {
        let mut n = notification("hi", "");
        let post = n.to_post("bot-moodle", "chan-1");
        assert_eq!(post.user_id, "bot-moodle");
        assert_eq!(post.channel_id, "chan-1");
        assert_eq!(post.props.attachments.len(), 1);
        assert_eq!(post.props.attachments[0].title, DEFAULT_SUBJECT);
        assert_eq!(post.props.attachments[0].color, ATTACHMENT_COLOR);

        n.subject = "Assignment due".to_string();
        assert_eq!(n.to_post("b", "c").props.attachments[0].title, "Assignment due");
    }

    proptest! {
        #[test]
        fn property_message_used_verbatim_without_html(message in "[A-Za-z0-9 .,?]{1,80}") {
            let post = notification(&message, "").to_post("bot", "chan");
            prop_assert_eq!(attachment_text(&post), message.as_str());
        }
    }
}

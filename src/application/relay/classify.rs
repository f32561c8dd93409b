//! # Event Classifier
//!
//! Turns one opaque decoded stream message into a typed [`StreamEvent`].
//! The upstream signals stream start with a "friends" marker; content items
//! carry both a text and a user field.

use serde_json::{Map, Value};

use crate::domain::types::{Post, RepostFragment, StreamEvent};

/// Classify one decoded message. Pure; never fails.
pub fn classify(msg: &Value) -> StreamEvent {
    if msg.is_null() {
        return StreamEvent::Empty;
    }

    let Some(obj) = msg.as_object() else {
        return StreamEvent::Unrecognized;
    };
    if obj.is_empty() {
        return StreamEvent::Empty;
    }

    if obj.contains_key("friends") {
        return StreamEvent::Connected;
    }

    if obj.contains_key("text") && obj.contains_key("user") {
        if let Some(post) = post_from_object(obj) {
            return StreamEvent::Item(post);
        }
    }

    StreamEvent::Unrecognized
}

/// Build a [`Post`] from a decoded status object, if it has the expected
/// fields. Shared with the REST lookup path.
pub fn post_from_value(value: &Value) -> Option<Post> {
    value.as_object().and_then(post_from_object)
}

fn post_from_object(obj: &Map<String, Value>) -> Option<Post> {
    let id = obj.get("id_str")?.as_str()?.to_string();
    let author = screen_name(obj)?;
    let text = obj.get("text")?.as_str()?.to_string();

    let repost_of = obj
        .get("retweeted_status")
        .and_then(Value::as_object)
        .and_then(|original| {
            Some(RepostFragment {
                author: screen_name(original)?,
                text: original.get("text")?.as_str()?.to_string(),
            })
        });

    Some(Post {
        id,
        author,
        text,
        repost_of,
    })
}

fn screen_name(obj: &Map<String, Value>) -> Option<String> {
    obj.get("user")?
        .get("screen_name")?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_friends_marker_means_connected() {
        assert_eq!(classify(&json!({"friends": [1, 2, 3]})), StreamEvent::Connected);
    }

    #[test]
    fn test_status_becomes_item() {
        let msg = json!({
            "id_str": "1142",
            "text": "hello world",
            "user": {"screen_name": "ada"}
        });
        let StreamEvent::Item(post) = classify(&msg) else {
            panic!("expected an item");
        };
        assert_eq!(post.id, "1142");
        assert_eq!(post.author, "ada");
        assert_eq!(post.text, "hello world");
        assert!(post.repost_of.is_none());
    }

    #[test]
    fn test_reshare_carries_original_fragment() {
        let msg = json!({
            "id_str": "2001",
            "text": "RT @grace: nofollow",
            "user": {"screen_name": "ada"},
            "retweeted_status": {
                "text": "original text",
                "user": {"screen_name": "grace"}
            }
        });
        let StreamEvent::Item(post) = classify(&msg) else {
            panic!("expected an item");
        };
        let original = post.repost_of.expect("reshare fragment");
        assert_eq!(original.author, "grace");
        assert_eq!(original.text, "original text");
    }

    #[test]
    fn test_null_and_empty_are_empty() {
        assert_eq!(classify(&Value::Null), StreamEvent::Empty);
        assert_eq!(classify(&json!({})), StreamEvent::Empty);
    }

    #[test]
    fn test_other_messages_are_unrecognized() {
        assert_eq!(classify(&json!({"delete": {"id": 1}})), StreamEvent::Unrecognized);
        assert_eq!(classify(&json!("just a string")), StreamEvent::Unrecognized);
        // A status missing its id is malformed, not an item.
        assert_eq!(
            classify(&json!({"text": "x", "user": {"screen_name": "a"}})),
            StreamEvent::Unrecognized
        );
    }
}

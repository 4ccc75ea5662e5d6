use super::Message;

/// Field changes made outside the editor widgets, such as from the command
/// line.
///
/// `None` leaves the loaded value alone, so updating a stored post only
/// touches what was asked for. An empty `category` or `external_link`
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostEdits {
    pub content: Option<String>,
    pub title: Option<String>,
    pub topic: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub external_link: Option<String>,
    pub published: Option<bool>,
}

impl PostEdits {
    /// The messages that carry these edits, in dispatch order.
    pub fn into_messages(self) -> Vec<Message> {
        let mut messages = Vec::new();
        if let Some(content) = self.content {
            messages.push(Message::Replace(content));
        }
        if let Some(title) = self.title {
            messages.push(Message::SetTitle(title));
        }
        if let Some(topic) = self.topic {
            messages.push(Message::SetTopic(topic));
        }
        if let Some(excerpt) = self.excerpt {
            messages.push(Message::SetExcerpt(excerpt));
        }
        if let Some(category) = self.category {
            messages.push(Message::SetCategory(Some(category)));
        }
        if let Some(link) = self.external_link {
            messages.push(Message::SetExternalLink(Some(link)));
        }
        if let Some(published) = self.published {
            messages.push(Message::SetPublished(published));
        }
        messages
    }
}

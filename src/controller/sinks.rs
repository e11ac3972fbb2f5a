//! The four UI surfaces the controller drives.
//!
//! Each surface is a separate trait so that a host can wire any mix of
//! terminal, HTML and in-memory implementations.

/// The control that starts an analysis. Disabled while a request is in flight.
pub trait TriggerControl {
    fn set_enabled(&mut self, enabled: bool);
}

/// A single line of human-readable status.
pub trait StatusText {
    fn set_text(&mut self, text: &str);
}

/// The loading affordance (spinner).
pub trait LoadingIndicator {
    fn set_visible(&mut self, visible: bool);
}

/// Where result cards go. Cards are appended in order; `clear` drops all.
pub trait ResultsContainer {
    fn clear(&mut self);
    fn append(&mut self, card: Card);
}

/// One rendered result card.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Card {
    pub title: String,
    pub body: CardBody,
}

/// Card content: either a preformatted block or labelled fields.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardBody {
    Preformatted(String),
    Fields(Vec<CardField>),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CardField {
    pub label: String,
    pub value: String,
}

impl Card {
    pub fn preformatted(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: CardBody::Preformatted(text.into()),
        }
    }

    pub fn fields<L, V>(title: impl Into<String>, fields: impl IntoIterator<Item = (L, V)>) -> Self
    where
        L: Into<String>,
        V: Into<String>,
    {
        Self {
            title: title.into(),
            body: CardBody::Fields(
                fields
                    .into_iter()
                    .map(|(label, value)| CardField {
                        label: label.into(),
                        value: value.into(),
                    })
                    .collect(),
            ),
        }
    }

    /// Plain-text content of the card body, fields joined as `label: value`
    /// lines.
    pub fn text(&self) -> String {
        match &self.body {
            CardBody::Preformatted(text) => text.clone(),
            CardBody::Fields(fields) => fields
                .iter()
                .map(|f| format!("{}: {}", f.label, f.value))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Look up a field value by label.
    pub fn field(&self, label: &str) -> Option<&str> {
        match &self.body {
            CardBody::Fields(fields) => fields
                .iter()
                .find(|f| f.label == label)
                .map(|f| f.value.as_str()),
            CardBody::Preformatted(_) => None,
        }
    }
}

/// Borrowed handles to the four surfaces, passed to the controller.
pub struct UiSinks<'a> {
    pub trigger: &'a mut dyn TriggerControl,
    pub status: &'a mut dyn StatusText,
    pub spinner: &'a mut dyn LoadingIndicator,
    pub results: &'a mut dyn ResultsContainer,
}

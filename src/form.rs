use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use url::Url;
use webbrowser::Browser;

use crate::error::{Result, SiteError};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";
pub const SENDING_LABEL: &str = "Sending...";
pub const INQUIRY_FIELD: &str = "inquiryType";
pub const CONSULTATION: &str = "consultation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub multiline: bool,
    /// choices for a select-style field; empty means free text
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormContent {
    pub endpoint: String,
    #[serde(default = "default_submit_label")]
    pub submit_label: String,
    pub fields: Vec<FieldSpec>,
}

fn default_submit_label() -> String {
    "Send Message".to_string()
}

/// Border state set by the last validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldMark {
    #[default]
    Untouched,
    Valid,
    Invalid,
}

impl FieldMark {
    pub fn border(&self) -> Option<(u8, u8, u8)> {
        match self {
            FieldMark::Untouched => None,
            FieldMark::Valid => Some((0xE0, 0xE0, 0xE0)),
            FieldMark::Invalid => Some((0xFF, 0x44, 0x44)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Field {
    pub spec: FieldSpec,
    pub value: String,
    pub mark: FieldMark,
}

impl Field {
    fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitButton {
    #[default]
    Idle,
    Sending,
}

/// Field values on their way to the third-party endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub endpoint: Url,
    pub fields: Vec<(String, String)>,
}

impl Submission {
    /// Endpoint with the fields as query parameters.
    pub fn url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().extend_pairs(self.fields.iter());
        url
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Required fields were empty; names of the offending fields.
    Blocked(Vec<String>),
    Proceed(Submission),
    /// The button is disabled while an earlier submission is in flight.
    Pending,
}

/// Where a validated submission goes once the form lets it through.
pub trait SubmitTarget {
    fn deliver(&mut self, submission: &Submission) -> Result<()>;
}

/// Hands the submission to the system browser, which completes the
/// request against the form service.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserHandoff;

impl SubmitTarget for BrowserHandoff {
    fn deliver(&mut self, submission: &Submission) -> Result<()> {
        if !Browser::is_available() {
            warn!("no browser available, submission not delivered");
            return Ok(());
        }
        let url = submission.url();
        info!(endpoint = %submission.endpoint, "handing contact form to browser");
        webbrowser::open(url.as_str()).map_err(SiteError::Browser)
    }
}

#[derive(Debug, Clone)]
pub struct ContactForm {
    endpoint: Url,
    submit_label: String,
    fields: Vec<Field>,
    focus: usize,
    button: SubmitButton,
}

impl ContactForm {
    pub fn new(content: &FormContent) -> Result<Self> {
        let endpoint =
            Url::parse(&content.endpoint).map_err(|source| SiteError::InvalidEndpoint {
                endpoint: content.endpoint.clone(),
                source,
            })?;
        let fields = content
            .fields
            .iter()
            .map(|spec| Field {
                spec: spec.clone(),
                value: String::new(),
                mark: FieldMark::Untouched,
            })
            .collect();
        Ok(Self {
            endpoint,
            submit_label: content.submit_label.clone(),
            fields,
            focus: 0,
            button: SubmitButton::Idle,
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.spec.name == name)
    }

    pub fn focus(&self) -> usize {
        self.focus
    }

    pub fn button(&self) -> SubmitButton {
        self.button
    }

    pub fn button_label(&self) -> &str {
        match self.button {
            SubmitButton::Idle => &self.submit_label,
            SubmitButton::Sending => SENDING_LABEL,
        }
    }

    pub fn focus_next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn focus_prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Type into the focused field. Option fields cycle their choices on
    /// space instead of taking text.
    pub fn insert_char(&mut self, c: char) {
        let Some(field) = self.fields.get_mut(self.focus) else {
            return;
        };
        if field.spec.options.is_empty() {
            field.value.push(c);
        } else if c == ' ' {
            let next = field
                .spec
                .options
                .iter()
                .position(|o| *o == field.value)
                .map_or(0, |i| (i + 1) % field.spec.options.len());
            field.value = field.spec.options[next].clone();
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            if field.spec.options.is_empty() {
                field.value.pop();
            } else {
                field.value.clear();
            }
        }
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.fields.iter_mut().find(|f| f.spec.name == name) {
            Some(field) => {
                field.value = value.to_string();
                true
            }
            None => false,
        }
    }

    /// Preselect the consultation inquiry, as the booking buttons do.
    pub fn select_consultation(&mut self) -> bool {
        self.set_value(INQUIRY_FIELD, CONSULTATION)
    }

    /// Validate required fields and either block or release the submission.
    pub fn submit(&mut self) -> SubmitOutcome {
        if self.button == SubmitButton::Sending {
            return SubmitOutcome::Pending;
        }
        self.button = SubmitButton::Sending;

        let mut missing = vec![];
        for field in self.fields.iter_mut().filter(|f| f.spec.required) {
            if field.is_blank() {
                field.mark = FieldMark::Invalid;
                missing.push(field.spec.name.clone());
            } else {
                field.mark = FieldMark::Valid;
            }
        }

        if !missing.is_empty() {
            self.button = SubmitButton::Idle;
            return SubmitOutcome::Blocked(missing);
        }

        SubmitOutcome::Proceed(Submission {
            endpoint: self.endpoint.clone(),
            fields: self
                .fields
                .iter()
                .map(|f| (f.spec.name.clone(), f.value.clone()))
                .collect(),
        })
    }

    /// Re-enable the button after a handoff that did not go through.
    pub fn reset_button(&mut self) {
        self.button = SubmitButton::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn spec(name: &str, required: bool) -> FieldSpec {
        FieldSpec {
            name: name.into(),
            label: name.into(),
            required,
            multiline: false,
            options: vec![],
        }
    }

    fn form() -> ContactForm {
        let mut inquiry = spec(INQUIRY_FIELD, false);
        inquiry.options = vec!["general".into(), CONSULTATION.into()];
        ContactForm::new(&FormContent {
            endpoint: "https://formsubmit.co/hello@example.com".into(),
            submit_label: "Send".into(),
            fields: vec![spec("name", true), spec("email", true), inquiry],
        })
        .unwrap()
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let err = ContactForm::new(&FormContent {
            endpoint: "not a url".into(),
            submit_label: "Send".into(),
            fields: vec![],
        })
        .unwrap_err();
        assert_matches!(err, SiteError::InvalidEndpoint { .. });
    }

    #[test]
    fn empty_required_fields_block() {
        let mut f = form();
        f.set_value("name", "Ada");
        f.set_value("email", "   ");
        assert_eq!(f.submit(), SubmitOutcome::Blocked(vec!["email".into()]));
        assert_eq!(f.field("name").unwrap().mark, FieldMark::Valid);
        assert_eq!(f.field("email").unwrap().mark, FieldMark::Invalid);
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().mark, FieldMark::Untouched);
        assert_eq!(f.button(), SubmitButton::Idle);
        assert_eq!(f.button_label(), "Send");
    }

    #[test]
    fn complete_form_proceeds() {
        let mut f = form();
        f.set_value("name", "Ada");
        f.set_value("email", "ada@example.com");
        let outcome = f.submit();
        assert_matches!(&outcome, SubmitOutcome::Proceed(s) if s.fields.len() == 3);
        assert_eq!(f.button(), SubmitButton::Sending);
        assert_eq!(f.button_label(), SENDING_LABEL);

        if let SubmitOutcome::Proceed(s) = outcome {
            let url = s.url();
            assert_eq!(url.host_str(), Some("formsubmit.co"));
            assert!(url.query().unwrap().contains("email=ada%40example.com"));
        }
    }

    #[test]
    fn sending_form_ignores_another_submit() {
        let mut f = form();
        f.set_value("name", "Ada");
        f.set_value("email", "ada@example.com");
        assert_matches!(f.submit(), SubmitOutcome::Proceed(_));
        assert_eq!(f.submit(), SubmitOutcome::Pending);
        assert_eq!(f.button(), SubmitButton::Sending);

        f.reset_button();
        assert_matches!(f.submit(), SubmitOutcome::Proceed(_));
    }

    #[test]
    fn typing_goes_to_focused_field() {
        let mut f = form();
        f.insert_char('A');
        f.focus_next();
        f.insert_char('x');
        f.backspace();
        f.insert_char('b');
        assert_eq!(f.field("name").unwrap().value, "A");
        assert_eq!(f.field("email").unwrap().value, "b");
        f.focus_prev();
        f.focus_prev();
        assert_eq!(f.focus(), 2);
    }

    #[test]
    fn option_fields_cycle_on_space() {
        let mut f = form();
        f.focus_prev();
        f.insert_char('z');
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().value, "");
        f.insert_char(' ');
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().value, "general");
        f.insert_char(' ');
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().value, CONSULTATION);
        f.insert_char(' ');
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().value, "general");
    }

    #[test]
    fn consultation_preselect() {
        let mut f = form();
        assert!(f.select_consultation());
        assert_eq!(f.field(INQUIRY_FIELD).unwrap().value, CONSULTATION);
    }
}

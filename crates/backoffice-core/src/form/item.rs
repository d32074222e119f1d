// Form item descriptors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::rules::Rule;

/// Free-form props handed to the item wrapper or its setter.
pub type Props = serde_json::Map<String, Value>;

/// Kind of input control that edits a field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Setter {
    #[default]
    Input,
    InputNumber,
    Password,
    Textarea,
    Select,
    Cascader,
    TreeSelect,
    Radio,
    Checkbox,
    Switch,
    Date,
    DateRange,
    Time,
    Upload,
    Submit,
    /// A host-registered control.
    Custom(String),
}

impl Setter {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Input => "input",
            Self::InputNumber => "inputNumber",
            Self::Password => "password",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Cascader => "cascader",
            Self::TreeSelect => "treeSelect",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::Date => "date",
            Self::DateRange => "dateRange",
            Self::Time => "time",
            Self::Upload => "upload",
            Self::Submit => "submit",
            Self::Custom(name) => name,
        }
    }
}

impl FromStr for Setter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "input" => Self::Input,
            "inputNumber" => Self::InputNumber,
            "password" => Self::Password,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "cascader" => Self::Cascader,
            "treeSelect" => Self::TreeSelect,
            "radio" => Self::Radio,
            "checkbox" => Self::Checkbox,
            "switch" => Self::Switch,
            "date" => Self::Date,
            "dateRange" => Self::DateRange,
            "time" => Self::Time,
            "upload" => Self::Upload,
            "submit" => Self::Submit,
            other => Self::Custom(other.to_owned()),
        })
    }
}

impl From<String> for Setter {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(setter) => setter,
            Err(never) => match never {},
        }
    }
}

impl From<Setter> for String {
    fn from(setter: Setter) -> Self {
        setter.as_str().to_owned()
    }
}

impl fmt::Display for Setter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a search trigger (icon click or enter key) does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchHook {
    /// Slot exists but nothing happens until a host rebinds it.
    Noop,
    /// Ask the owning table to reload from page one.
    Reload,
}

/// One field of a form.
///
/// `field` may be a bracketed multi-key expression; see
/// [`FieldSpec`](crate::field_spec::FieldSpec).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormItem {
    pub field: String,
    pub setter: Setter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub item_props: Props,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub setter_props: Props,
    /// Initial value seeded into the model.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    #[serde(skip)]
    pub on_search: Option<SearchHook>,
    #[serde(skip)]
    pub on_press_enter: Option<SearchHook>,
}

impl FormItem {
    pub fn new(field: impl Into<String>, setter: Setter) -> Self {
        Self {
            field: field.into(),
            setter,
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn setter_prop(mut self, key: impl Into<String>, value: Value) -> Self {
        self.setter_props.insert(key.into(), value);
        self
    }

    /// Label if set, otherwise the field key.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.field)
    }

    pub fn is_submit(&self) -> bool {
        self.setter == Setter::Submit || self.field == "submit"
    }
}

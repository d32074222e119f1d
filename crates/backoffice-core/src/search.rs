// ── Search form builder ──
//
// Turns declarative search descriptors into normalized form items plus a
// model. Descriptors may `extend` an item of another form (usually the
// create dialog) by field name and override parts of it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::field_spec::FormModel;
use crate::form::{Form, FormItem, Props, Rule, SearchHook, Setter, seed_model};

/// One search descriptor. Every property is optional so that an extended
/// item can supply the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Field name of the item to inherit from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extend: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setter: Option<Setter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub item_props: Props,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub setter_props: Props,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Rule>,
    /// Install a search-icon trigger.
    pub searchable: bool,
    /// Install an enter-key trigger.
    pub enterable: bool,
}

impl SearchItem {
    pub fn field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            ..Self::default()
        }
    }

    pub fn extend(key: impl Into<String>) -> Self {
        Self {
            extend: Some(key.into()),
            ..Self::default()
        }
    }

    /// `field`, or the extend key when no field is given.
    fn key(&self) -> Option<&str> {
        self.field
            .as_deref()
            .filter(|f| !f.is_empty())
            .or(self.extend.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchObject {
    pub items: Vec<SearchItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<FormModel>,
    #[serde(skip_serializing_if = "Props::is_empty")]
    pub form_props: Props,
    /// Drop the `submit` item (no search button).
    pub hide_search: bool,
}

/// Search configuration: a bare item list or the full object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchConfig {
    Items(Vec<SearchItem>),
    Object(SearchObject),
}

impl SearchConfig {
    /// Number of configured descriptors, before the submit item is added or
    /// dropped.
    pub fn item_count(&self) -> usize {
        match self {
            Self::Items(items) => items.len(),
            Self::Object(object) => object.items.len(),
        }
    }
}

impl From<Vec<SearchItem>> for SearchConfig {
    fn from(items: Vec<SearchItem>) -> Self {
        Self::Items(items)
    }
}

/// Normalized search form, ready to be turned into a [`Form`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchForm {
    pub items: Vec<FormItem>,
    pub model: FormModel,
    pub form_props: Props,
}

impl SearchForm {
    pub fn into_form(self) -> Form {
        Form::new(self.items, self.model)
    }
}

/// Build the search form, or `None` when no configuration is given.
pub fn build_search_form(
    search: Option<&SearchConfig>,
    extend_items: &[FormItem],
) -> Option<SearchForm> {
    let search = search?;
    let (items, model, form_props, hide_search) = match search {
        SearchConfig::Items(items) => (items.as_slice(), None, None, false),
        SearchConfig::Object(obj) => (
            obj.items.as_slice(),
            obj.model.as_ref(),
            Some(&obj.form_props),
            obj.hide_search,
        ),
    };

    let extend_map: HashMap<&str, &FormItem> = extend_items
        .iter()
        .map(|item| (item.field.as_str(), item))
        .collect();

    let items: Vec<FormItem> = items
        .iter()
        .filter(|item| !(hide_search && item.key() == Some("submit")))
        .map(|item| normalize_item(item, &extend_map))
        .collect();

    let mut form_props = form_props.cloned().unwrap_or_default();
    form_props
        .entry("layout")
        .or_insert_with(|| Value::from("inline"));

    let mut model = model.cloned().unwrap_or_default();
    seed_model(&items, &mut model);

    Some(SearchForm {
        items,
        model,
        form_props,
    })
}

fn normalize_item(raw: &SearchItem, extend_map: &HashMap<&str, &FormItem>) -> FormItem {
    let mut item = match raw.extend.as_deref() {
        Some(key) => extend_map.get(key).map_or_else(
            || {
                warn!(extend = key, "search item extends an unknown field, using its own properties");
                FormItem::default()
            },
            |base| (*base).clone(),
        ),
        None => FormItem::default(),
    };

    // Own properties win over the extended ones.
    if let Some(field) = raw.key() {
        if item.field.is_empty() || raw.field.as_deref().is_some_and(|f| !f.is_empty()) {
            item.field = field.to_owned();
        }
    }
    if let Some(setter) = &raw.setter {
        item.setter = setter.clone();
    }
    if raw.label.is_some() {
        item.label.clone_from(&raw.label);
    }
    if raw.value.is_some() {
        item.value.clone_from(&raw.value);
    }
    if !raw.rules.is_empty() {
        item.rules.clone_from(&raw.rules);
    }
    merge_props(&mut item.item_props, &raw.item_props);
    merge_props(&mut item.setter_props, &raw.setter_props);

    // Defaults for whatever is still unset.
    item.item_props
        .entry("hideLabel")
        .or_insert(Value::Bool(true));
    if let Some(label) = &item.label {
        item.setter_props
            .entry("placeholder")
            .or_insert_with(|| Value::from(label.as_str()));
    }
    if raw.searchable {
        item.on_search = Some(SearchHook::Noop);
    }
    if raw.enterable {
        item.on_press_enter = Some(SearchHook::Noop);
    }
    item
}

/// Deep-merge `overlay` into `base`. Nested objects merge; everything else
/// is replaced.
pub(crate) fn merge_props(base: &mut Props, overlay: &Props) {
    for (key, value) in overlay {
        match (base.get_mut(key), value) {
            (Some(Value::Object(target)), Value::Object(source)) => merge_props(target, source),
            _ => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

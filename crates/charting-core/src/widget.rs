//! The declarative widget tree that describes a charting form.
//!
//! Structural widgets (`group`, `grid`, `flex-row`, `conditional`,
//! `inline-inputs`) only arrange other widgets. Every other widget is a leaf
//! that owns one slot in the flat answer map, addressed by its `key`. Leaf
//! keys must be unique across the whole tree; the interpreter checks this
//! when a session is opened.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::error::CoreError;
use crate::options::{ConditionalProps, OptionEntry};

/// A charting form configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetTree {
    /// Charting schema version supplied by the configuration service.
    /// Carried through untouched; the interpreter does not branch on it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub widgets: Vec<Widget>,
}

impl WidgetTree {
    pub fn new(widgets: Vec<Widget>) -> Self {
        Self {
            version: None,
            widgets,
        }
    }

    /// Parse a tree from JSON. Accepts either `{ "widgets": [...] }` or a
    /// bare array of widgets.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let tree = if value.is_array() {
            serde_json::from_value(value).map(Self::new)
        } else {
            serde_json::from_value(value)
        };
        tree.map_err(|e| CoreError::Configuration(e.to_string()))
    }

    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        Self::from_json(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Widget {
    #[serde(rename = "group")]
    Group(GroupWidget),
    #[serde(rename = "grid")]
    Grid(GridWidget),
    #[serde(rename = "flex-row")]
    FlexRow(GridWidget),
    #[serde(rename = "conditional")]
    Conditional(ConditionalWidget),
    #[serde(rename = "inline-inputs")]
    InlineInputs(InlineInputsWidget),
    #[serde(rename = "table")]
    Table(TableWidget),
    #[serde(rename = "entry-editor")]
    EntryEditor(ChoiceWidget),
    #[serde(rename = "tiered-inputs")]
    TieredInputs(TieredInputsWidget),
    #[serde(rename = "input:text")]
    Text(InputWidget),
    #[serde(rename = "input:textarea")]
    Textarea(InputWidget),
    #[serde(rename = "input:number")]
    Number(InputWidget),
    #[serde(rename = "input:date")]
    Date(InputWidget),
    #[serde(rename = "input:time")]
    Time(InputWidget),
    #[serde(rename = "input:phone")]
    Phone(InputWidget),
    #[serde(rename = "input:checkbox")]
    Checkbox(ChoiceWidget),
    #[serde(rename = "input:radio")]
    Radio(ChoiceWidget),
    #[serde(rename = "select")]
    Select(ChoiceWidget),
    #[serde(rename = "combobox")]
    Combobox(ChoiceWidget),
    #[serde(rename = "tag-input")]
    TagInput(ChoiceWidget),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub widgets: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub cols: Vec<GridColumn>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridColumn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<u8>,
    pub widget: Widget,
}

/// Widgets shown only while any of `conditions` holds. `otherwise` is shown
/// when none do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub conditions: Vec<Condition>,
    pub widgets: Vec<Widget>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub otherwise: Vec<Widget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InlineInputsWidget {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub inputs: Vec<Widget>,
}

/// Repeatable entries; each entry is answered against `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableWidget {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub columns: Vec<Widget>,
}

impl TableWidget {
    /// The column leaf stored under `key` within one entry.
    pub fn column(&self, key: &str) -> Option<&Widget> {
        self.columns.iter().find(|w| w.key() == Some(key))
    }
}

/// A chain of dependent inputs stored together under one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredInputsWidget {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    pub inputs: Vec<TieredInput>,
}

impl TieredInputsWidget {
    /// Position of the chain input called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TieredInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: TierInputKind,
    pub props: Vec<ConditionalProps>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TierInputKind {
    #[default]
    Select,
    Combobox,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputWidget {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoiceWidget {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<OptionEntry>,
    #[serde(default)]
    pub multiple: bool,
}

/// The storage shape of a leaf widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafKind {
    Text,
    Textarea,
    Number,
    Date,
    Time,
    Phone,
    Checkbox,
    Radio,
    Select,
    Combobox,
    TagInput,
    Table,
    EntryEditor,
    TieredInputs,
}

impl LeafKind {
    /// The `type` tag used in widget JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            LeafKind::Text => "input:text",
            LeafKind::Textarea => "input:textarea",
            LeafKind::Number => "input:number",
            LeafKind::Date => "input:date",
            LeafKind::Time => "input:time",
            LeafKind::Phone => "input:phone",
            LeafKind::Checkbox => "input:checkbox",
            LeafKind::Radio => "input:radio",
            LeafKind::Select => "select",
            LeafKind::Combobox => "combobox",
            LeafKind::TagInput => "tag-input",
            LeafKind::Table => "table",
            LeafKind::EntryEditor => "entry-editor",
            LeafKind::TieredInputs => "tiered-inputs",
        }
    }
}

impl fmt::Display for LeafKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Widget {
    /// Storage key of a leaf; `None` for structural widgets.
    pub fn key(&self) -> Option<&str> {
        match self {
            Widget::Group(_)
            | Widget::Grid(_)
            | Widget::FlexRow(_)
            | Widget::Conditional(_)
            | Widget::InlineInputs(_) => None,
            Widget::Table(w) => Some(&w.key),
            Widget::TieredInputs(w) => Some(&w.key),
            Widget::Text(w)
            | Widget::Textarea(w)
            | Widget::Number(w)
            | Widget::Date(w)
            | Widget::Time(w)
            | Widget::Phone(w) => Some(&w.key),
            Widget::EntryEditor(w)
            | Widget::Checkbox(w)
            | Widget::Radio(w)
            | Widget::Select(w)
            | Widget::Combobox(w)
            | Widget::TagInput(w) => Some(&w.key),
        }
    }

    pub fn leaf_kind(&self) -> Option<LeafKind> {
        let kind = match self {
            Widget::Group(_)
            | Widget::Grid(_)
            | Widget::FlexRow(_)
            | Widget::Conditional(_)
            | Widget::InlineInputs(_) => return None,
            Widget::Table(_) => LeafKind::Table,
            Widget::EntryEditor(_) => LeafKind::EntryEditor,
            Widget::TieredInputs(_) => LeafKind::TieredInputs,
            Widget::Text(_) => LeafKind::Text,
            Widget::Textarea(_) => LeafKind::Textarea,
            Widget::Number(_) => LeafKind::Number,
            Widget::Date(_) => LeafKind::Date,
            Widget::Time(_) => LeafKind::Time,
            Widget::Phone(_) => LeafKind::Phone,
            Widget::Checkbox(_) => LeafKind::Checkbox,
            Widget::Radio(_) => LeafKind::Radio,
            Widget::Select(_) => LeafKind::Select,
            Widget::Combobox(_) => LeafKind::Combobox,
            Widget::TagInput(_) => LeafKind::TagInput,
        };
        Some(kind)
    }

    pub fn is_required(&self) -> bool {
        match self {
            Widget::Table(w) => w.required,
            Widget::TieredInputs(w) => w.required,
            Widget::Text(w)
            | Widget::Textarea(w)
            | Widget::Number(w)
            | Widget::Date(w)
            | Widget::Time(w)
            | Widget::Phone(w) => w.required,
            Widget::EntryEditor(w)
            | Widget::Checkbox(w)
            | Widget::Radio(w)
            | Widget::Select(w)
            | Widget::Combobox(w)
            | Widget::TagInput(w) => w.required,
            Widget::Group(_)
            | Widget::Grid(_)
            | Widget::FlexRow(_)
            | Widget::Conditional(_)
            | Widget::InlineInputs(_) => false,
        }
    }

    /// Direct children of a structural widget that share the flat answer
    /// map. A conditional yields both its guarded and `otherwise` branches.
    /// Table columns are not included; they live inside the table's value.
    pub fn children(&self) -> Vec<&Widget> {
        match self {
            Widget::Group(g) => g.widgets.iter().collect(),
            Widget::Grid(g) | Widget::FlexRow(g) => g.cols.iter().map(|c| &c.widget).collect(),
            Widget::Conditional(c) => c.widgets.iter().chain(&c.otherwise).collect(),
            Widget::InlineInputs(i) => i.inputs.iter().collect(),
            Widget::Table(_)
            | Widget::EntryEditor(_)
            | Widget::TieredInputs(_)
            | Widget::Text(_)
            | Widget::Textarea(_)
            | Widget::Number(_)
            | Widget::Date(_)
            | Widget::Time(_)
            | Widget::Phone(_)
            | Widget::Checkbox(_)
            | Widget::Radio(_)
            | Widget::Select(_)
            | Widget::Combobox(_)
            | Widget::TagInput(_) => Vec::new(),
        }
    }
}

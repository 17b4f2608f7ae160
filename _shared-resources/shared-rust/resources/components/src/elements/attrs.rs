// Accessibility attributes, rendered elements and content
// The inspectable structure every menu element produces before it is drawn

use ratatui::style::Style;
use ratatui::text::Line;
use std::fmt;

use crate::core::{ElementId, MenuCloser};

/// Accessibility role of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Row of tabs
    MenuBar,
    /// The shared popup
    Menu,
    /// A tab or an item
    MenuItem,
    /// Layout-only wrapper
    Presentation,
}

/// Accessibility attributes. `None` means "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AriaAttrs {
    pub id: Option<ElementId>,
    pub role: Option<Role>,
    pub label: Option<String>,
    /// Space separated id references
    pub labelled_by: Option<String>,
    pub controls: Option<ElementId>,
    pub has_popup: Option<bool>,
    pub expanded: Option<bool>,
    pub disabled: Option<bool>,
    pub active_descendant: Option<ElementId>,
    /// 0 = reachable by sequential focus, -1 = programmatic focus only
    pub tab_index: Option<i32>,
    pub hidden: Option<bool>,
}

impl AriaAttrs {
    /// Overlay `other` on top of `self`: every attribute set in `other` wins
    pub fn merge(&mut self, other: AriaAttrs) {
        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if other.$field.is_some() { self.$field = other.$field; })*
            };
        }
        overlay!(
            id,
            role,
            label,
            labelled_by,
            controls,
            has_popup,
            expanded,
            disabled,
            active_descendant,
            tab_index,
            hidden
        );
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled.unwrap_or(false)
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }

    /// Reachable by Tab / Shift+Tab
    pub fn is_focusable(&self) -> bool {
        !self.is_disabled() && self.tab_index.map(|index| index >= 0).unwrap_or(false)
    }
}

/// A rendered element: text, style, accessibility attributes and children
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub attrs: AriaAttrs,
    pub line: Line<'static>,
    pub style: Style,
    pub children: Vec<Element>,
}

impl Element {
    /// Plain text element
    pub fn label(text: impl Into<String>) -> Self {
        Self {
            line: Line::from(text.into()),
            ..Self::default()
        }
    }

    /// Element built from an already styled line
    pub fn from_line(line: Line<'static>) -> Self {
        Self {
            line,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Merge attributes onto this element (caller-set attributes are overridden)
    pub fn with_attrs(mut self, attrs: AriaAttrs) -> Self {
        self.attrs.merge(attrs);
        self
    }

    pub fn with_children(mut self, children: Vec<Element>) -> Self {
        self.children = children;
        self
    }

    pub fn id(&self) -> Option<&ElementId> {
        self.attrs.id.as_ref()
    }

    /// Visible text of this element's own line
    pub fn text(&self) -> String {
        self.line
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect()
    }

    /// Depth-first search by id
    pub fn find(&self, id: &ElementId) -> Option<&Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Values handed to render callbacks of tabs and items
#[derive(Debug, Clone)]
pub struct RenderProps {
    /// Hovered or focused
    pub active: bool,
    pub disabled: bool,
    /// Whether the popup is open
    pub open: bool,
    /// Closes the popup
    pub close: MenuCloser,
}

type RenderFn = Box<dyn Fn(&RenderProps) -> Element>;

/// Content of a tab or item: a label to wrap, or a callback producing the caller's own element
pub enum Content {
    Label(String),
    Interactive(RenderFn),
}

impl Content {
    pub fn label(text: impl Into<String>) -> Self {
        Content::Label(text.into())
    }

    pub fn interactive(render: impl Fn(&RenderProps) -> Element + 'static) -> Self {
        Content::Interactive(Box::new(render))
    }

    /// Produce the element for the current props.
    /// Labels are wrapped in a new element carrying `attrs`; interactive content keeps the
    /// caller's element and gets `attrs` merged onto it.
    pub fn materialize(&self, props: &RenderProps, attrs: AriaAttrs, style: Style) -> Element {
        match self {
            Content::Label(text) => Element {
                attrs,
                line: Line::from(text.clone()),
                style,
                children: Vec::new(),
            },
            Content::Interactive(render) => render(props).with_attrs(attrs),
        }
    }
}

impl fmt::Debug for Content {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Content::Label(text) => f.debug_tuple("Label").field(text).finish(),
            Content::Interactive(_) => f.write_str("Interactive(..)"),
        }
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Content::label(text)
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Content::Label(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StoreHandle;
    use ratatui::style::Color;

    fn props(active: bool) -> RenderProps {
        RenderProps {
            active,
            disabled: false,
            open: false,
            close: MenuCloser::new(StoreHandle::detached()),
        }
    }

    fn tab_attrs() -> AriaAttrs {
        AriaAttrs {
            id: Some(ElementId::new("t1")),
            role: Some(Role::MenuItem),
            tab_index: Some(0),
            ..AriaAttrs::default()
        }
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base = AriaAttrs {
            label: Some("caller label".to_string()),
            role: Some(Role::Presentation),
            ..AriaAttrs::default()
        };
        base.merge(tab_attrs());
        assert_eq!(base.role, Some(Role::MenuItem));
        assert_eq!(base.label.as_deref(), Some("caller label"));
        assert_eq!(base.id, Some(ElementId::new("t1")));
    }

    #[test]
    fn test_label_content_is_wrapped() {
        let style = Style::default().fg(Color::Cyan);
        let element = Content::label("English").materialize(&props(false), tab_attrs(), style);
        assert_eq!(element.text(), "English");
        assert_eq!(element.style, style);
        assert_eq!(element.attrs, tab_attrs());
    }

    #[test]
    fn test_interactive_content_keeps_caller_element() {
        let content = Content::interactive(|props: &RenderProps| {
            let text = if props.active { "> Deutsch" } else { "Deutsch" };
            Element::label(text)
                .with_style(Style::default().fg(Color::Magenta))
                .with_attrs(AriaAttrs {
                    label: Some("German".to_string()),
                    ..AriaAttrs::default()
                })
        });

        let element = content.materialize(&props(true), tab_attrs(), Style::default());
        assert_eq!(element.text(), "> Deutsch");
        assert_eq!(element.style, Style::default().fg(Color::Magenta));
        assert_eq!(element.attrs.label.as_deref(), Some("German"));
        assert_eq!(element.attrs.role, Some(Role::MenuItem));
    }

    #[test]
    fn test_focusable() {
        let mut attrs = tab_attrs();
        assert!(attrs.is_focusable());
        attrs.disabled = Some(true);
        assert!(!attrs.is_focusable());
        attrs.disabled = None;
        attrs.tab_index = Some(-1);
        assert!(!attrs.is_focusable());
    }

    #[test]
    fn test_find_by_id() {
        let child = Element::label("x").with_attrs(tab_attrs());
        let root = Element::label("root").with_children(vec![child.clone()]);
        assert_eq!(root.find(&ElementId::new("t1")), Some(&child));
        assert_eq!(root.find(&ElementId::new("nope")), None);
    }
}

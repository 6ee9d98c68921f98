//! Click routing between row selection and in-row controls
//!
//! A click is described by the path of nodes from the hit target up to the
//! root. Walking that path up to the first row decides which single handler
//! receives the click.

/// Editable control embedded in a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Tags,
    CaptureDate,
    Suffix,
}

/// One level of the hit path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Inert content such as a label or padding
    Inert,
    /// An element flagged interactive
    Interactive(Control),
    /// The row boundary carrying the entry at this visible row
    Row(usize),
}

/// Where a click ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickRoute {
    Row(usize),
    Control { row: usize, control: Control },
    /// Outside any row
    Ignored,
}

/// Walk from the target towards the root and pick exactly one handler.
#[must_use]
pub fn route(path: &[Node]) -> ClickRoute {
    let mut control = None;

    for node in path {
        match *node {
            Node::Inert => {}
            Node::Interactive(c) => {
                control.get_or_insert(c);
            }
            Node::Row(row) => {
                return control.map_or(ClickRoute::Row(row), |control| ClickRoute::Control {
                    row,
                    control,
                });
            }
        }
    }

    ClickRoute::Ignored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inert_target_selects_row() {
        assert_eq!(route(&[Node::Inert, Node::Row(3)]), ClickRoute::Row(3));
        assert_eq!(route(&[Node::Row(0)]), ClickRoute::Row(0));
    }

    #[test]
    fn test_interactive_target_suppresses_row() {
        let path = [Node::Inert, Node::Interactive(Control::Suffix), Node::Row(2)];
        assert_eq!(route(&path), ClickRoute::Control { row: 2, control: Control::Suffix });
    }

    #[test]
    fn test_nearest_control_wins() {
        let path = [
            Node::Interactive(Control::Tags),
            Node::Interactive(Control::Suffix),
            Node::Row(1),
        ];
        assert_eq!(route(&path), ClickRoute::Control { row: 1, control: Control::Tags });
    }

    #[test]
    fn test_outside_row_is_ignored() {
        assert_eq!(route(&[Node::Inert]), ClickRoute::Ignored);
        assert_eq!(route(&[Node::Interactive(Control::Tags)]), ClickRoute::Ignored);
        assert_eq!(route(&[]), ClickRoute::Ignored);
    }
}

//! Element sequence primitives: the single splice entry point and run lookup

use super::element::Element;

/// Options for [`splice_element_list`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpliceOptions {
    /// Delete frame elements of non-deletable controls too
    pub ignore_deleted_rule: bool,
    pub is_design_mode: bool,
}

impl SpliceOptions {
    pub fn ignoring_rules() -> Self {
        Self {
            ignore_deleted_rule: true,
            is_design_mode: false,
        }
    }
}

/// Frame elements of a control that must not be removed by a bulk deletion
fn is_protected(element: &Element) -> bool {
    element.control.as_ref().is_some_and(|c| !c.is_deletable())
        && element.control_component.is_some_and(|c| c.is_frame())
}

/// Remove `delete_count` elements at `start` and insert `insert` in their place.
///
/// Returns the removed elements. Out-of-range bounds are clamped. Callers own
/// every index that points past `start` and must renumber it.
pub fn splice_element_list(
    list: &mut Vec<Element>,
    start: usize,
    delete_count: usize,
    insert: Vec<Element>,
    options: SpliceOptions,
) -> Vec<Element> {
    let start = start.min(list.len());
    let end = start.saturating_add(delete_count).min(list.len());
    tracing::trace!(start, end, inserted = insert.len(), "splice");

    if options.ignore_deleted_rule || options.is_design_mode {
        return list.splice(start..end, insert).collect();
    }

    let mut removed = Vec::with_capacity(end - start);
    let mut merged = insert;
    let mut kept = Vec::new();
    for element in list.drain(start..end) {
        if is_protected(&element) {
            kept.push(element);
        } else {
            removed.push(element);
        }
    }
    merged.extend(kept);
    list.splice(start..start, merged);
    removed
}

/// Bounds `(first, last)` of the control run containing `index`
pub fn control_run_bounds(list: &[Element], index: usize) -> Option<(usize, usize)> {
    let control_id = list.get(index)?.control_id.as_deref()?;
    let mut first = index;
    while first > 0 && list[first - 1].in_control(control_id) {
        first -= 1;
    }
    let mut last = index;
    while last + 1 < list.len() && list[last + 1].in_control(control_id) {
        last += 1;
    }
    Some((first, last))
}

/// Locate the run of `control_id`, trying `hint` before scanning the list
pub fn find_control_run(list: &[Element], control_id: &str, hint: usize) -> Option<(usize, usize)> {
    let index = if list.get(hint).is_some_and(|e| e.in_control(control_id)) {
        hint
    } else {
        list.iter().position(|e| e.in_control(control_id))?
    };
    control_run_bounds(list, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ControlComponent, ControlDescriptor, ControlType, ElementType};

    fn run(id: &str, deletable: bool) -> Vec<Element> {
        let control = ControlDescriptor {
            deletable: Some(deletable),
            ..ControlDescriptor::new(ControlType::Text)
        };
        [
            ("{", ControlComponent::Prefix),
            ("x", ControlComponent::Value),
            ("}", ControlComponent::Postfix),
        ]
        .into_iter()
        .map(|(value, component)| Element {
            value: value.to_string(),
            element_type: Some(ElementType::Control),
            control_id: Some(id.to_string()),
            control: Some(Box::new(control.clone())),
            control_component: Some(component),
            ..Default::default()
        })
        .collect()
    }

    #[test]
    fn test_splice_replaces_range() {
        let mut list = vec![Element::zero(), Element::text("a"), Element::text("b")];
        let removed = splice_element_list(
            &mut list,
            1,
            1,
            vec![Element::text("x"), Element::text("y")],
            SpliceOptions::default(),
        );
        assert_eq!(removed.len(), 1);
        let text: String = list.iter().map(|e| e.value.as_str()).collect();
        assert_eq!(text, "\u{200B}xyb");
    }

    #[test]
    fn test_splice_clamps_out_of_range() {
        let mut list = vec![Element::zero()];
        let removed = splice_element_list(&mut list, 5, 3, vec![], SpliceOptions::default());
        assert!(removed.is_empty());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_splice_keeps_frames_of_non_deletable_control() {
        let mut list = vec![Element::zero()];
        list.extend(run("c", false));
        splice_element_list(&mut list, 1, 3, vec![], SpliceOptions::default());
        let components: Vec<_> = list.iter().map(|e| e.control_component).collect();
        assert_eq!(
            components,
            vec![
                None,
                Some(ControlComponent::Prefix),
                Some(ControlComponent::Postfix)
            ]
        );

        splice_element_list(&mut list, 1, 2, vec![], SpliceOptions::ignoring_rules());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_run_bounds_from_any_index() {
        let mut list = vec![Element::zero()];
        list.extend(run("a", true));
        list.extend(run("b", true));
        assert_eq!(control_run_bounds(&list, 2), Some((1, 3)));
        assert_eq!(control_run_bounds(&list, 4), Some((4, 6)));
        assert_eq!(control_run_bounds(&list, 0), None);
        assert_eq!(find_control_run(&list, "b", 0), Some((4, 6)));
        assert_eq!(find_control_run(&list, "z", 0), None);
    }
}

use crate::report::CheckError;
use crate::structure::{ActualNode, CanonicalNode};

/// Compares a required child sequence against a scanned one.
///
/// A canonical node matches the first actual node with the same name and
/// kind. A missing node yields exactly one error and its subtree is never
/// descended into, so one missing directory cannot cascade into errors for
/// its children. Within one directory all missing-child errors come first,
/// then matched subdirectories are recursed in canonical order.
pub fn diff(canonical: &[CanonicalNode], actual: &[ActualNode]) -> Vec<CheckError> {
    let mut errors = Vec::new();
    let mut matched_dirs = Vec::new();

    for required in canonical {
        let found = actual
            .iter()
            .find(|node| node.name() == required.name() && node.kind() == required.kind());

        match (required, found) {
            (_, None) => errors.push(CheckError::StructureMissing {
                kind: required.kind(),
                name: required.name().to_string(),
            }),
            (
                CanonicalNode::Directory { children, .. },
                Some(ActualNode::Directory {
                    children: actual_children,
                    ..
                }),
            ) => matched_dirs.push((children.as_slice(), actual_children.as_slice())),
            _ => {}
        }
    }

    for (children, actual_children) in matched_dirs {
        errors.extend(diff(children, actual_children));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::NodeKind;

    fn required_layout() -> Vec<CanonicalNode> {
        vec![
            CanonicalNode::file("index.html"),
            CanonicalNode::directory("styles", vec![CanonicalNode::file("style.css")]),
            CanonicalNode::directory("fonts", vec![CanonicalNode::file("fonts.css")]),
        ]
    }

    fn complete_submission() -> Vec<ActualNode> {
        vec![
            ActualNode::file("index.html"),
            ActualNode::directory("styles", vec![ActualNode::file("style.css")]),
            ActualNode::directory("fonts", vec![ActualNode::file("fonts.css")]),
        ]
    }

    #[test]
    fn complete_tree_yields_no_errors() {
        assert_eq!(diff(&required_layout(), &complete_submission()), []);
    }

    #[test]
    fn missing_directory_yields_one_error_without_descending() {
        let actual = vec![
            ActualNode::file("index.html"),
            ActualNode::directory("styles", vec![ActualNode::file("style.css")]),
        ];

        let errors = diff(&required_layout(), &actual);
        assert_eq!(
            errors,
            [CheckError::StructureMissing {
                kind: NodeKind::Directory,
                name: "fonts".into(),
            }]
        );
    }

    #[test]
    fn missing_file_inside_matched_directory_is_reported() {
        let actual = vec![
            ActualNode::file("index.html"),
            ActualNode::directory("styles", vec![]),
            ActualNode::directory("fonts", vec![ActualNode::file("fonts.css")]),
        ];

        let errors = diff(&required_layout(), &actual);
        assert_eq!(
            errors,
            [CheckError::StructureMissing {
                kind: NodeKind::File,
                name: "style.css".into(),
            }]
        );
    }

    #[test]
    fn kind_mismatch_counts_as_missing() {
        // A file named like a required directory is not a match.
        let actual = vec![
            ActualNode::file("index.html"),
            ActualNode::directory("styles", vec![ActualNode::file("style.css")]),
            ActualNode::file("fonts"),
        ];

        let errors = diff(&required_layout(), &actual);
        assert_eq!(
            errors,
            [CheckError::StructureMissing {
                kind: NodeKind::Directory,
                name: "fonts".into(),
            }]
        );
    }

    #[test]
    fn direct_absences_precede_nested_ones() {
        let canonical = vec![
            CanonicalNode::directory("styles", vec![CanonicalNode::file("style.css")]),
            CanonicalNode::file("index.html"),
        ];
        let actual = vec![ActualNode::directory("styles", vec![])];

        let errors = diff(&canonical, &actual);
        assert_eq!(
            errors,
            [
                CheckError::StructureMissing {
                    kind: NodeKind::File,
                    name: "index.html".into(),
                },
                CheckError::StructureMissing {
                    kind: NodeKind::File,
                    name: "style.css".into(),
                },
            ]
        );
    }

    #[test]
    fn actual_order_does_not_matter() {
        let mut shuffled = complete_submission();
        shuffled.reverse();
        assert_eq!(diff(&required_layout(), &shuffled), []);
    }

    #[test]
    fn diff_is_idempotent() {
        let actual = vec![ActualNode::file("index.html")];
        let first = diff(&required_layout(), &actual);
        let second = diff(&required_layout(), &actual);
        assert_eq!(first, second);
    }

    #[test]
    fn extra_actual_nodes_are_ignored() {
        let mut actual = complete_submission();
        actual.push(ActualNode::file("README.md"));
        actual.push(ActualNode::directory("assets", vec![]));
        assert_eq!(diff(&required_layout(), &actual), []);
    }
}

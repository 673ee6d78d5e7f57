//! Tree rendering of a draft for `coursedraft show`

use termtree::Tree;

use crate::domain::{format_file_size, CourseDraftTree, QuestionKind};

fn label(title: &str) -> &str {
    if title.trim().is_empty() {
        "(untitled)"
    } else {
        title
    }
}

/// Build a printable tree: course, modules, lessons with files, assessment questions.
pub fn draft_tree(tree: &CourseDraftTree) -> Tree<String> {
    let course = tree.course();
    let mut root = Tree::new(format!("{} [{}]", label(&course.title), tree.id()));

    for (module_id, module) in tree.modules() {
        let mut module_node = Tree::new(format!("module {} [{}]", label(&module.title), module_id));

        for (lesson_id, lesson) in tree.lessons(module_id).unwrap_or_default() {
            let mut lesson_node =
                Tree::new(format!("lesson {} [{}]", label(&lesson.title), lesson_id));
            for (file_id, file) in tree.files(module_id, lesson_id).unwrap_or_default() {
                lesson_node.push(Tree::new(format!(
                    "{} ({}, {}) [{}]",
                    file.name,
                    file.media_type,
                    format_file_size(file.size),
                    file_id
                )));
            }
            module_node.push(lesson_node);
        }

        let questions = tree.questions(module_id).unwrap_or_default();
        if module.has_assessment || !questions.is_empty() {
            let state = if module.has_assessment { "on" } else { "off" };
            let mut assessment = Tree::new(format!(
                "assessment {} (passing {}%, {})",
                label(&module.assessment.title),
                module.assessment.passing_score,
                state
            ));
            for (question_id, question) in questions {
                let mut question_node = Tree::new(format!(
                    "{} {} [{}]",
                    question.kind,
                    label(&question.prompt),
                    question_id
                ));
                match question.kind {
                    QuestionKind::MultipleChoice => {
                        for (i, option) in question.options.iter().enumerate() {
                            let mark = if !option.is_empty() && *option == question.correct_answer {
                                "*"
                            } else {
                                " "
                            };
                            question_node.push(Tree::new(format!("{}{} {}", mark, i, option)));
                        }
                    }
                    QuestionKind::TrueFalse => {
                        question_node
                            .push(Tree::new(format!("answer: {}", question.correct_answer)));
                    }
                }
                assessment.push(question_node);
            }
            module_node.push(assessment);
        }

        root.push(module_node);
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldPath, FieldValue, SequentialIds};
    use std::sync::Arc;

    #[test]
    fn given_draft_when_rendering_then_lists_nodes_with_ids() {
        let mut tree = CourseDraftTree::with_id("c".into(), Arc::new(SequentialIds::new("n")));
        let module = tree.add_module().unwrap();
        tree.add_lesson(&module).unwrap();
        tree.set_field(
            &"title".parse::<FieldPath>().unwrap(),
            FieldValue::Text("Rust".into()),
        )
        .unwrap();

        let rendered = draft_tree(&tree).to_string();

        assert!(rendered.starts_with("Rust [c]"));
        assert!(rendered.contains("module (untitled) [n-1]"));
        assert!(rendered.contains("lesson (untitled) [n-2]"));
    }
}

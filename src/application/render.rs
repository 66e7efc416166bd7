//! Renderers: turn a finished decision tree into text
//!
//! Internal nodes are labelled with their comparison, leaves with the final
//! ordering, edges with `Yes`/`No`; pruned leaves become placeholders.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use termtree::Tree;
use tracing::instrument;

use crate::application::ApplicationError;
use crate::domain::{Branch, DecisionNode, DecisionTree, Element};

pub trait Renderer<T: Element> {
    fn render(&self, tree: &DecisionTree<T>) -> String;
}

const DOCUMENT_HEAD: &str = r"\documentclass[tikz, border=5pt]{standalone}
\usepackage{forest}

\begin{document}
";

const FOREST_HEAD: &str = r"\begin{forest}
  for tree={
    edge label = {font=\scriptsize},
    circle,
    draw,
    if n children=0{
      rectangle, draw
    }{}
  }
";

const FOREST_TAIL: &str = r"\end{forest}
";

const DOCUMENT_TAIL: &str = r"\end{document}
";

/// Indentation added per tree level.
const TAB_PAD: &str = "  ";

/// Standalone LaTeX document drawing the tree with the `forest` package.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForestRenderer;

impl ForestRenderer {
    fn render_node<T: Element>(node: &DecisionNode<T>, edge: &str, pad: &str, out: &mut String) {
        out.push_str(pad);
        out.push_str("[ ");
        match node {
            DecisionNode::Decision { comparison, yes, no } => {
                out.push_str(&Self::labelled(&format!("${comparison}$"), edge));
                out.push('\n');
                let child_pad = format!("{pad}{TAB_PAD}");
                Self::render_node(yes, Branch::Yes.label(), &child_pad, out);
                Self::render_node(no, Branch::No.label(), &child_pad, out);
                out.push_str(pad);
                out.push_str("]\n");
            }
            DecisionNode::Leaf(data) => {
                out.push_str(&Self::labelled(&data.iter().join(" "), edge));
                out.push_str(" ]\n");
            }
            DecisionNode::Pruned => out.push_str(", phantom ]\n"),
        }
    }

    fn labelled(label: &str, edge: &str) -> String {
        format!(r"{label}, edge label={{node[midway,fill=white,font=\tiny] {{{edge}}}}}")
    }
}

impl<T: Element> Renderer<T> for ForestRenderer {
    #[instrument(level = "debug", skip_all)]
    fn render(&self, tree: &DecisionTree<T>) -> String {
        let mut tree_code = String::new();
        Self::render_node(tree.root(), "", TAB_PAD, &mut tree_code);
        let tree_code = tree_code.strip_suffix('\n').unwrap_or(&tree_code);

        let mut out = String::new();
        out.push_str(DOCUMENT_HEAD);
        out.push_str(FOREST_HEAD);
        out.push_str(tree_code);
        out.push('\n');
        out.push_str(FOREST_TAIL);
        out.push('\n');
        out.push_str(DOCUMENT_TAIL);
        out
    }
}

/// Terminal diagram built with `termtree`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    fn to_tree_string<T: Element>(node: &DecisionNode<T>, branch: Option<Branch>) -> Tree<String> {
        let label = match node {
            DecisionNode::Pruned => "(pruned)".to_string(),
            DecisionNode::Leaf(data) if data.is_empty() => "(empty)".to_string(),
            _ => node.label(),
        };
        let text = match branch {
            Some(branch) => format!("{branch}: {label}"),
            None => label,
        };

        let leaves: Vec<_> = node
            .children()
            .into_iter()
            .map(|(branch, child)| Self::to_tree_string(child, Some(branch)))
            .collect();

        Tree::new(text).with_leaves(leaves)
    }
}

impl<T: Element> Renderer<T> for TextRenderer {
    #[instrument(level = "debug", skip_all)]
    fn render(&self, tree: &DecisionTree<T>) -> String {
        Self::to_tree_string(tree.root(), None).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// LaTeX `forest` document
    #[default]
    Latex,
    /// Plain text tree
    Text,
}

impl OutputFormat {
    pub fn renderer<T: Element>(self) -> Box<dyn Renderer<T>> {
        match self {
            OutputFormat::Latex => Box::new(ForestRenderer),
            OutputFormat::Text => Box::new(TextRenderer),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Latex => "latex",
            OutputFormat::Text => "text",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutputFormat {
    type Err = ApplicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latex" | "tex" => Ok(OutputFormat::Latex),
            "text" | "txt" => Ok(OutputFormat::Text),
            _ => Err(ApplicationError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Comparison, Operator};

    fn two_leaf_tree() -> DecisionTree<String> {
        DecisionTree::new(DecisionNode::Decision {
            comparison: Comparison::new("b".to_string(), Operator::Greater, "a".to_string()),
            yes: Box::new(DecisionNode::Leaf(vec!["a".to_string(), "b".to_string()])),
            no: Box::new(DecisionNode::Pruned),
        })
    }

    #[test]
    fn given_tree_when_rendering_forest_then_matches_layout() {
        let expected = r"\documentclass[tikz, border=5pt]{standalone}
\usepackage{forest}

\begin{document}
\begin{forest}
  for tree={
    edge label = {font=\scriptsize},
    circle,
    draw,
    if n children=0{
      rectangle, draw
    }{}
  }
  [ $b > a$, edge label={node[midway,fill=white,font=\tiny] {}}
    [ a b, edge label={node[midway,fill=white,font=\tiny] {Yes}} ]
    [ , phantom ]
  ]
\end{forest}

\end{document}
";
        assert_eq!(ForestRenderer.render(&two_leaf_tree()), expected);
    }

    #[test]
    fn given_tree_when_rendering_text_then_labels_edges() {
        let text = TextRenderer.render(&two_leaf_tree());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "b > a");
        assert!(lines[1].ends_with("Yes: a b"), "{text}");
        assert!(lines[2].ends_with("No: (pruned)"), "{text}");
    }

    #[test]
    fn given_format_name_when_parsed_then_returns_format() {
        assert_eq!("LaTeX".parse::<OutputFormat>().unwrap(), OutputFormat::Latex);
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert!(matches!(
            "svg".parse::<OutputFormat>(),
            Err(ApplicationError::UnknownFormat(_))
        ));
    }
}

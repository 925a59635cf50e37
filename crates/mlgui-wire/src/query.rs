//! Recursive search query tree.
//!
//! Used by `DefineSearches` (server to GUI) and `SearchQuery` (GUI to server).
//! Type bytes 0, 1, 2, 3 and 13 are structural; every other type byte is a
//! leaf field (keywords, size bounds, format, media fields and so on) carrying
//! a label and a default value.

use serde::Serialize;

use crate::cursor::ByteCursor;
use crate::error::{CodecError, CodecResult};
use crate::string::WireString;

/// Nesting limit for decoding and encoding. Real search forms stay far below it.
pub const MAX_QUERY_DEPTH: usize = 64;

const AND: u8 = 0;
const OR: u8 = 1;
const AND_NOT: u8 = 2;
const MODULE: u8 = 3;
const HIDDEN_FIELDS: u8 = 13;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum QueryNode {
    And { children: Vec<QueryNode> },
    Or { children: Vec<QueryNode> },
    AndNot {
        left: Box<QueryNode>,
        right: Box<QueryNode>,
    },
    Module {
        name: WireString,
        query: Box<QueryNode>,
    },
    HiddenFields { children: Vec<QueryNode> },
    Field {
        field_type: u8,
        comment: WireString,
        default: WireString,
    },
}

impl QueryNode {
    pub fn field(
        field_type: u8,
        comment: impl Into<WireString>,
        default: impl Into<WireString>,
    ) -> Self {
        Self::Field {
            field_type,
            comment: comment.into(),
            default: default.into(),
        }
    }

    pub fn type_code(&self) -> u8 {
        match self {
            Self::And { .. } => AND,
            Self::Or { .. } => OR,
            Self::AndNot { .. } => AND_NOT,
            Self::Module { .. } => MODULE,
            Self::HiddenFields { .. } => HIDDEN_FIELDS,
            Self::Field { field_type, .. } => *field_type,
        }
    }

    /// Nesting depth; a leaf is depth 1.
    pub fn depth(&self) -> usize {
        match self {
            Self::And { children } | Self::Or { children } | Self::HiddenFields { children } => {
                1 + children.iter().map(Self::depth).max().unwrap_or(0)
            }
            Self::AndNot { left, right } => 1 + left.depth().max(right.depth()),
            Self::Module { query, .. } => 1 + query.depth(),
            Self::Field { .. } => 1,
        }
    }
}

fn is_structural(code: u8) -> bool {
    matches!(code, AND | OR | AND_NOT | MODULE | HIDDEN_FIELDS)
}

impl ByteCursor {
    pub fn get_query(&mut self) -> CodecResult<QueryNode> {
        self.get_query_at(1)
    }

    fn get_query_at(&mut self, depth: usize) -> CodecResult<QueryNode> {
        if depth > MAX_QUERY_DEPTH {
            return Err(CodecError::QueryTooDeep {
                max: MAX_QUERY_DEPTH,
            });
        }

        let code = self.get_u8()?;
        let node = match code {
            AND | OR | HIDDEN_FIELDS => {
                let count = self.get_count()?;
                // Every child takes at least one byte.
                let mut children = Vec::with_capacity(count.min(self.remaining()));
                for _ in 0..count {
                    children.push(self.get_query_at(depth + 1)?);
                }
                match code {
                    AND => QueryNode::And { children },
                    OR => QueryNode::Or { children },
                    _ => QueryNode::HiddenFields { children },
                }
            }
            AND_NOT => {
                let left = Box::new(self.get_query_at(depth + 1)?);
                let right = Box::new(self.get_query_at(depth + 1)?);
                QueryNode::AndNot { left, right }
            }
            MODULE => {
                let name = self.get_string()?;
                let query = Box::new(self.get_query_at(depth + 1)?);
                QueryNode::Module { name, query }
            }
            field_type => {
                let comment = self.get_string()?;
                let default = self.get_string()?;
                QueryNode::Field {
                    field_type,
                    comment,
                    default,
                }
            }
        };
        Ok(node)
    }

    pub fn put_query(&mut self, node: &QueryNode) -> CodecResult<()> {
        self.put_query_at(node, 1)
    }

    fn put_query_at(&mut self, node: &QueryNode, depth: usize) -> CodecResult<()> {
        if depth > MAX_QUERY_DEPTH {
            return Err(CodecError::QueryTooDeep {
                max: MAX_QUERY_DEPTH,
            });
        }

        self.put_u8(node.type_code());
        match node {
            QueryNode::And { children }
            | QueryNode::Or { children }
            | QueryNode::HiddenFields { children } => {
                self.put_count(children.len())?;
                for child in children {
                    self.put_query_at(child, depth + 1)?;
                }
            }
            QueryNode::AndNot { left, right } => {
                self.put_query_at(left, depth + 1)?;
                self.put_query_at(right, depth + 1)?;
            }
            QueryNode::Module { name, query } => {
                self.put_string(name)?;
                self.put_query_at(query, depth + 1)?;
            }
            QueryNode::Field {
                field_type,
                comment,
                default,
            } => {
                if is_structural(*field_type) {
                    return Err(CodecError::ReservedQueryType(*field_type));
                }
                self.put_string(comment)?;
                self.put_string(default)?;
            }
        }
        Ok(())
    }
}

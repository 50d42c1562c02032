//! AST node representation and the cons-list idiom used to build it
//! (spec §3, §4.2).

mod list;
mod node;

pub use list::{children, cons, elem, link, list as make_list, reverse, string, string_from_list};
pub use node::{Kind, LinkPayload, Node};

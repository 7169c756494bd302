mod item;
mod ordered;
mod parser;
mod result;
mod vocabulary;

pub use self::item::{Catalog, Item};
pub use self::ordered::OrderedMap;
pub use self::parser::{CanonicalMap, Parser};
pub use self::result::{FieldLabels, LabelCount, MatchedBook, QueryResult};
pub use self::vocabulary::Vocabulary;

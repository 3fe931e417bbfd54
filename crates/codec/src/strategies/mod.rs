mod segmented;
pub mod single_tree;
pub mod split;

pub use segmented::Segmented;
pub use single_tree::{InfoByte, SingleTree};
pub use split::{merge_parts, split_symbols, SplitOutput};

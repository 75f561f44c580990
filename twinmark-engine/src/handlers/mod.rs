//! Built-in handlers
//!
//! | Name       | Priority | Block syntax                  | Inline syntax | Node                     |
//! |------------|----------|-------------------------------|---------------|--------------------------|
//! | `table`    | 40       | Pipe table with `---` row     |               | `Table`                  |
//! | `plantuml` | 44       | ```` ```plantuml ```` fence   |               | `Diagram`                |
//! | `code`     | 45       | ```` ```lang ```` fence       |               | `CodeBlock`              |
//! | `math`     | 50       | `$$…$$`                       | `$…$`         | `MathBlock`/`MathInline` |
//!
//! The diagram fence outranks the generic code fence so that ```` ```plantuml ```` never becomes a
//! code block.

pub mod code;
pub mod diagram;
pub mod math;
pub mod table;

use crate::handler::Handler;
use std::sync::Arc;

pub use code::{language_label, CodeHandler};
pub use diagram::{DiagramFormat, DiagramHandler, DiagramSettings};
pub use math::MathHandler;
pub use table::TableHandler;

pub fn table() -> Handler {
    let handler = Arc::new(TableHandler);
    Handler::new(table::NAME)
        .with_priority(table::PRIORITY)
        .with_block_parser(handler.clone())
        .with_serializer(handler)
}

pub fn diagram(settings: &DiagramSettings) -> Handler {
    let handler = Arc::new(DiagramHandler::new(settings.clone()));
    Handler::new(diagram::NAME)
        .with_priority(diagram::PRIORITY)
        .with_block_parser(handler.clone())
        .with_serializer(handler)
}

pub fn code() -> Handler {
    let handler = Arc::new(CodeHandler);
    Handler::new(code::NAME)
        .with_priority(code::PRIORITY)
        .with_block_parser(handler.clone())
        .with_serializer(handler)
}

pub fn math() -> Handler {
    let handler = Arc::new(MathHandler);
    Handler::new(math::NAME)
        .with_priority(math::PRIORITY)
        .with_block_parser(handler.clone())
        .with_inline_transformer(handler.clone())
        .with_serializer(handler)
}

/// All four built-in handlers
pub fn standard_handlers(diagram_settings: &DiagramSettings) -> Vec<Handler> {
    vec![table(), diagram(diagram_settings), code(), math()]
}

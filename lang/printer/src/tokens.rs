//! This module contains the symbols and keywords of the C++ fragment that we prettyprint.

// Symbols
//
//

/// The symbol `,`
pub const COMMA: &str = ",";

/// The symbol `::`
pub const SCOPE: &str = "::";

/// The symbol `...`
pub const ELLIPSIS: &str = "...";

/// The symbol `*`
pub const STAR: &str = "*";

/// The symbol `&`
pub const AMPERSAND: &str = "&";

/// The symbol `&&`
pub const DOUBLE_AMPERSAND: &str = "&&";

/// The symbol `[]`
pub const BRACKETS: &str = "[]";

/// The symbol `!`
pub const BANG: &str = "!";

/// The symbol `-`
pub const MINUS: &str = "-";

/// The symbol `=`
pub const EQUALS: &str = "=";

// Keywords
//
//

/// The keyword `const`
pub const CONST: &str = "const";

/// The keyword `typename`
pub const TYPENAME: &str = "typename";

/// The keyword `template`
pub const TEMPLATE: &str = "template";

/// The keyword `true`
pub const TRUE: &str = "true";

/// The keyword `false`
pub const FALSE: &str = "false";

/// The keyword `static_assert`
pub const STATIC_ASSERT: &str = "static_assert";

/// The keyword `using`
pub const USING: &str = "using";

/// The keyword `constexpr`
pub const CONSTEXPR: &str = "constexpr";

/// The keyword `struct`
pub const STRUCT: &str = "struct";

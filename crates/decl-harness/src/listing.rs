//! The golden listing: one line per symbol.
//!
//! ```text
//! <kind> <qualified-name>[ | <detail>]
//! ```
//!
//! Blank lines and lines starting with `#` are ignored when reading.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use decl_core::{
    AggregateType, DefinitionState, EnumType, Function, GlobalVariable, Payload, Symbol,
    SymbolKind, Visibility,
};
use decl_table::SymbolTable;

use crate::error::HarnessError;

const DETAIL_SEPARATOR: &str = " | ";
const MEMBER_SEPARATOR: &str = "; ";
const DECLARED: &str = "[declared]";

/// One line of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub kind: SymbolKind,
    pub name: String,
    pub detail: Option<String>,
}

impl ListingEntry {
    /// Parse one non-comment line.
    ///
    /// # Errors
    /// Returns a reason when the kind is unknown or the name is missing.
    pub fn parse(line: &str) -> Result<Self, String> {
        let (head, detail) = match line.split_once(DETAIL_SEPARATOR) {
            Some((head, detail)) => (head, Some(detail.trim().to_string())),
            None => (line, None),
        };
        let head = head.trim();
        let Some((kind, name)) = head.split_once(' ') else {
            return Err(format!("expected `<kind> <name>`, found `{head}`"));
        };
        let kind: SymbolKind = kind.parse().map_err(|e: decl_core::CoreError| e.to_string())?;
        let name = name.trim();
        if name.is_empty() {
            return Err("missing symbol name".to_string());
        }
        Ok(Self {
            kind,
            name: name.to_string(),
            detail: detail.filter(|d| !d.is_empty()),
        })
    }
}

impl fmt::Display for ListingEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if let Some(detail) = &self.detail {
            write!(f, "{DETAIL_SEPARATOR}{detail}")?;
        }
        Ok(())
    }
}

/// Render every symbol that came from one of `files`, in table order.
#[must_use]
pub fn render(table: &SymbolTable, files: &[String]) -> Vec<ListingEntry> {
    let files: HashSet<&str> = files.iter().map(String::as_str).collect();
    table
        .iter()
        .filter(|(_, symbol)| files.contains(symbol.location.path.as_str()))
        .map(|(_, symbol)| ListingEntry {
            kind: symbol.kind,
            name: symbol.name.to_string(),
            detail: detail(table, symbol),
        })
        .collect()
}

/// Read a golden file.
///
/// # Errors
/// Returns `HarnessError::Golden` with the 1-based line of the first bad
/// entry.
pub fn parse_golden(path: &Path, text: &str) -> Result<Vec<ListingEntry>, HarnessError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            ListingEntry::parse(line).map_err(|reason| HarnessError::Golden {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })
        })
        .collect()
}

/// The text a blessed golden file holds.
#[must_use]
pub fn to_golden_text(fixture: &str, entries: &[ListingEntry]) -> String {
    let mut text = format!("# Expected symbols for fixture `{fixture}`.\n");
    for entry in entries {
        text.push_str(&entry.to_string());
        text.push('\n');
    }
    text
}

fn detail(table: &SymbolTable, symbol: &Symbol) -> Option<String> {
    match &symbol.payload {
        Payload::Aggregate(aggregate) => aggregate_detail(table, symbol, aggregate),
        Payload::Enum(enumeration) => enum_detail(table, symbol.state, enumeration),
        Payload::EnumVariant(variant) => {
            let owner = table.get(variant.owner).map(|s| s.name.to_string())?;
            Some(format!("{owner} = {}", variant.value))
        }
        Payload::Alias(alias) => Some(table.render_type(&alias.target)),
        Payload::Function(function) => Some(function_detail(table, symbol.state, function)),
        Payload::Variable(variable) => Some(variable_detail(table, variable)),
        Payload::FunctionPointer(_) | Payload::Namespace(_) => None,
    }
}

const fn default_visibility(kind: SymbolKind) -> Visibility {
    match kind {
        SymbolKind::Class => Visibility::Private,
        _ => Visibility::Public,
    }
}

fn aggregate_detail(table: &SymbolTable, symbol: &Symbol, aggregate: &AggregateType) -> Option<String> {
    if symbol.state == DefinitionState::Declared {
        return Some(DECLARED.to_string());
    }
    let default = default_visibility(symbol.kind);
    let mut members = Vec::new();
    if let Some(base) = &aggregate.base {
        members.push(format!("base {} {}", base.access, table.render_type(&base.ty)));
    }
    for field in &aggregate.fields {
        let mut member = String::new();
        if field.visibility != default {
            member.push_str(&format!("{} ", field.visibility));
        }
        member.push_str(&format!("{}: {}", field.name, table.render_type(&field.ty)));
        if let Some(width) = field.bit_width {
            member.push_str(&format!(":{width}"));
        }
        members.push(member);
    }
    (!members.is_empty()).then(|| members.join(MEMBER_SEPARATOR))
}

fn enum_detail(table: &SymbolTable, state: DefinitionState, enumeration: &EnumType) -> Option<String> {
    let mut members = Vec::new();
    if let Some(underlying) = &enumeration.underlying {
        members.push(format!("underlying {}", table.render_type(underlying)));
    }
    if state == DefinitionState::Declared {
        members.push(DECLARED.to_string());
    }
    members.extend(
        enumeration
            .variants
            .iter()
            .map(|v| format!("{} = {}", v.name, v.value)),
    );
    (!members.is_empty()).then(|| members.join(MEMBER_SEPARATOR))
}

fn function_detail(table: &SymbolTable, state: DefinitionState, function: &Function) -> String {
    let mut out = String::new();
    if let Some(visibility) = function.visibility {
        let default = function
            .owner
            .as_ref()
            .and_then(|owner| table.lookup(owner).find(|(_, s)| s.kind.is_aggregate()))
            .map(|(_, owner)| default_visibility(owner.kind));
        if default != Some(visibility) {
            out.push_str(&format!("{visibility} "));
        }
    }
    if function.is_static {
        out.push_str("static ");
    }
    if function.is_virtual {
        out.push_str("virtual ");
    }

    let mut params: Vec<String> = function
        .params
        .iter()
        .map(|p| {
            let ty = table.render_type(&p.ty);
            if p.has_default { format!("{ty} = default") } else { ty }
        })
        .collect();
    if function.variadic {
        params.push("...".to_string());
    }
    out.push_str(&format!("({})", params.join(", ")));

    if function.is_const {
        out.push_str(" const");
    }
    if function.is_pure {
        out.push_str(" = 0");
    }
    if let Some(ret) = &function.return_type {
        out.push_str(&format!(" -> {}", table.render_type(ret)));
    }
    if state == DefinitionState::Declared {
        out.push(' ');
        out.push_str(DECLARED);
    }
    out
}

fn variable_detail(table: &SymbolTable, variable: &GlobalVariable) -> String {
    let mut out = String::new();
    if variable.is_extern {
        out.push_str("extern ");
    }
    if variable.is_static {
        out.push_str("static ");
    }
    out.push_str(&table.render_type(&variable.ty));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("struct Point | x: int; y: int", SymbolKind::Struct, "Point", Some("x: int; y: int"))]
    #[case("namespace geometry", SymbolKind::Namespace, "geometry", None)]
    #[case(
        "function_pointer_type int (*)(const void*, const void*)",
        SymbolKind::FunctionPointerType,
        "int (*)(const void*, const void*)",
        None
    )]
    #[case("method a::B::f |  (int) const ", SymbolKind::Method, "a::B::f", Some("(int) const"))]
    fn parses_lines(
        #[case] line: &str,
        #[case] kind: SymbolKind,
        #[case] name: &str,
        #[case] detail: Option<&str>,
    ) {
        let entry = ListingEntry::parse(line).expect("valid line");
        assert_eq!(entry.kind, kind);
        assert_eq!(entry.name, name);
        assert_eq!(entry.detail.as_deref(), detail);
    }

    #[rstest]
    #[case::no_name("struct")]
    #[case::unknown_kind("record Point")]
    fn rejects_bad_lines(#[case] line: &str) {
        assert!(ListingEntry::parse(line).is_err());
    }

    #[test]
    fn display_matches_parse() {
        let line = "enum_variant Color::Red | Color = 0";
        assert_eq!(ListingEntry::parse(line).expect("valid").to_string(), line);
    }

    #[test]
    fn golden_skips_comments_and_reports_line_numbers() {
        let text = "# header\n\nstruct A\nbogus line here\n";
        let err = parse_golden(Path::new("x.golden"), text).expect_err("bad line");
        let HarnessError::Golden { line, .. } = err else {
            panic!("expected golden error, got {err}");
        };
        assert_eq!(line, 4);
    }
}

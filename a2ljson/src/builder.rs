use fnv::FnvHashSet;
use std::collections::VecDeque;

use crate::A2lError;
use crate::blockdata::{A2lObject, BlockData, Item, Value};
use crate::diagnostic::{DiagnosticSink, Location};
use crate::literal::{parse_float, parse_int_type};
use crate::model::{A2lFile, RawBlock, RawItem, RawValue};
use crate::parser::{GenericBlock, Param};
use crate::specification::{BlockSpec, Multiplicity, ParamKind, ParamSpec, SPECIFICATION, lookup};

// the content of a block in source order
enum Entry {
    Param(Param),
    Block(GenericBlock),
}

// build_file()
// Check the block tree against the schema and convert it to the typed model.
pub(crate) fn build_file(root: GenericBlock, sink: &mut DiagnosticSink) -> Result<A2lFile, A2lError> {
    // the table starts with the implicit file block
    let spec = &SPECIFICATION[0];
    let data = build_block(root, spec, sink)?;
    Ok(A2lFile::from_data(data))
}

// merge_entries()
// Params and child blocks are stored separately by the parser; param_offset tells where
// each block was located between the params.
fn merge_entries(params: Vec<Param>, children: Vec<GenericBlock>) -> VecDeque<Entry> {
    let mut entries = VecDeque::with_capacity(params.len() + children.len());
    let mut params = params.into_iter();
    let mut consumed = 0;
    for child in children {
        let count = child.param_offset.saturating_sub(consumed);
        entries.extend(params.by_ref().take(count).map(Entry::Param));
        consumed += count;
        entries.push_back(Entry::Block(child));
    }
    entries.extend(params.map(Entry::Param));
    entries
}

// build a block that was written as /begin TAG ... /end TAG
fn build_block(
    block: GenericBlock,
    spec: &'static BlockSpec,
    sink: &mut DiagnosticSink,
) -> Result<BlockData, A2lError> {
    let GenericBlock {
        location,
        params,
        children,
        ..
    } = block;
    let mut entries = merge_entries(params, children);
    let mut data = BlockData::new(spec.tag);

    read_params(&mut data, spec, &mut entries, spec, location, sink)?;
    if spec.opaque {
        // the content is kept as it is
        data.raw_content = entries.into_iter().map(raw_item).collect();
    } else {
        read_children(&mut data, spec, entries, location, sink)?;
    }
    Ok(data)
}

// build_keyword()
// A keyword without /begin and /end takes its parameters from the content of the enclosing
// block. The parameters end at the next block or at the next keyword that the enclosing
// block permits.
fn build_keyword(
    spec: &'static BlockSpec,
    entries: &mut VecDeque<Entry>,
    parent_spec: &BlockSpec,
    location: Location,
    sink: &mut DiagnosticSink,
) -> Result<BlockData, A2lError> {
    let mut data = BlockData::new(spec.tag);
    read_params(&mut data, spec, entries, parent_spec, location, sink)?;
    Ok(data)
}

// read_params()
// Consume the positional parameters and the tail rows of a block.
fn read_params(
    data: &mut BlockData,
    spec: &BlockSpec,
    entries: &mut VecDeque<Entry>,
    stop_spec: &BlockSpec,
    location: Location,
    sink: &mut DiagnosticSink,
) -> Result<(), A2lError> {
    for param_spec in spec.params {
        let value = match next_positional(entries, stop_spec, param_spec.kind) {
            Some(param) => convert_param(&param, param_spec, sink)?
                .unwrap_or_else(|| default_value(param_spec)),
            None => {
                let location = next_location(entries).unwrap_or(location);
                sink.schema_violation(
                    location,
                    format!("{}: parameter \"{}\" is missing", spec.tag, param_spec.name),
                )?;
                default_value(param_spec)
            }
        };
        data.params.push(value);
    }

    if spec.tail.is_empty() {
        return Ok(());
    }
    while !at_stop(entries, stop_spec) {
        let row_location = next_location(entries).unwrap_or(location);
        let mut row = Vec::with_capacity(spec.tail.len());
        let mut is_valid = true;
        for param_spec in spec.tail {
            if let Some(param) = next_param(entries, stop_spec) {
                match convert_param(&param, param_spec, sink)? {
                    Some(value) => row.push(value),
                    None => is_valid = false,
                }
            } else {
                sink.schema_violation(
                    row_location,
                    format!(
                        "{}: incomplete row, parameter \"{}\" is missing",
                        spec.tag, param_spec.name
                    ),
                )?;
                row.push(default_value(param_spec));
            }
        }
        // a row with an invalid value is dropped entirely
        if is_valid {
            data.rows.push(row);
        }
    }

    if let Some(count_idx) = spec.count {
        if let Some(Value::Int(declared)) = data.params.get(count_idx) {
            let found = data.rows.len();
            if usize::try_from(*declared).ok() != Some(found) {
                sink.schema_violation(
                    location,
                    format!(
                        "{}: declared {declared} value rows, found {found}",
                        spec.tag
                    ),
                )?;
            }
        }
    }
    Ok(())
}

// read_children()
// Everything after the positional parameters: keywords and blocks, in any order.
fn read_children(
    data: &mut BlockData,
    spec: &'static BlockSpec,
    mut entries: VecDeque<Entry>,
    location: Location,
    sink: &mut DiagnosticSink,
) -> Result<(), A2lError> {
    let mut counts = vec![0usize; spec.children.len()];
    let mut names: Vec<FnvHashSet<String>> = vec![FnvHashSet::default(); spec.children.len()];

    while let Some(entry) = entries.pop_front() {
        match entry {
            Entry::Param(Param {
                value: RawValue::Identifier(tag),
                location: tag_location,
            }) => {
                if let (Some(position), Some(child_spec)) = (spec.child_position(&tag), lookup(&tag)) {
                    if child_spec.is_block {
                        sink.schema_violation(
                            tag_location,
                            format!("{tag} must be written as a block"),
                        )?;
                    }
                    let keep = check_count(spec, position, &mut counts, tag_location, sink)?;
                    let child = build_keyword(child_spec, &mut entries, spec, tag_location, sink)?;
                    if keep {
                        add_child(data, spec, position, child, &mut names, tag_location, sink)?;
                    }
                } else {
                    sink.unknown_keyword(
                        tag_location,
                        format!("unknown keyword {tag} in {}", spec.tag),
                    )?;
                    let mut raw = RawBlock::new(&tag, false);
                    while let Some(param) = next_param(&mut entries, spec) {
                        raw.content.push(RawItem::Value(param.value));
                    }
                    data.items.push(Item::Raw(raw));
                }
            }
            Entry::Param(param) => {
                sink.schema_violation(
                    param.location,
                    format!(
                        "unexpected parameter {} in {}",
                        raw_text(&param.value),
                        spec.tag
                    ),
                )?;
            }
            Entry::Block(block) => {
                let block_location = block.location;
                if let (Some(position), Some(child_spec)) =
                    (spec.child_position(&block.tag), lookup(&block.tag))
                {
                    if !child_spec.is_block {
                        sink.schema_violation(
                            block_location,
                            format!("{} must be written as a keyword", block.tag),
                        )?;
                    }
                    let keep = check_count(spec, position, &mut counts, block_location, sink)?;
                    let child = build_block(block, child_spec, sink)?;
                    if keep {
                        add_child(data, spec, position, child, &mut names, block_location, sink)?;
                    }
                } else {
                    sink.unknown_keyword(
                        block_location,
                        format!("unknown keyword {} in {}", block.tag, spec.tag),
                    )?;
                    data.items.push(Item::Raw(raw_block(block)));
                }
            }
        }
    }

    for (child, count) in spec.children.iter().zip(&counts) {
        if *count == 0 && matches!(child.multiplicity, Multiplicity::One | Multiplicity::Many) {
            sink.schema_violation(
                location,
                format!("missing required {} in {}", child.tag, spec.tag),
            )?;
        }
    }
    Ok(())
}

// check_count()
// Count an occurrence of a child; returns false if the child exceeds its multiplicity
fn check_count(
    spec: &BlockSpec,
    position: usize,
    counts: &mut [usize],
    location: Location,
    sink: &mut DiagnosticSink,
) -> Result<bool, A2lError> {
    let child = &spec.children[position];
    counts[position] += 1;
    if counts[position] > 1
        && matches!(child.multiplicity, Multiplicity::One | Multiplicity::ZeroOrOne)
    {
        sink.schema_violation(
            location,
            format!("{} may only occur once in {}", child.tag, spec.tag),
        )?;
        return Ok(false);
    }
    Ok(true)
}

fn add_child(
    data: &mut BlockData,
    spec: &BlockSpec,
    position: usize,
    child: BlockData,
    names: &mut [FnvHashSet<String>],
    location: Location,
    sink: &mut DiagnosticSink,
) -> Result<(), A2lError> {
    let child_spec = &spec.children[position];
    let is_sequence = matches!(child_spec.multiplicity, Multiplicity::Any | Multiplicity::Many);
    if is_sequence && lookup(child_spec.tag).is_some_and(BlockSpec::is_named) {
        if let Some(Value::Ident(name)) = child.params.first() {
            if !names[position].insert(name.clone()) {
                // the duplicate is kept
                sink.schema_violation(
                    location,
                    format!(
                        "duplicate {} name \"{name}\" in {}",
                        child_spec.tag, spec.tag
                    ),
                )?;
            }
        }
    }
    data.items.push(Item::Typed(child));
    Ok(())
}

// next_positional()
// A positional parameter only stops at a permitted keyword if the keyword is not a valid
// value for the parameter. An object may be named like a keyword, e.g. DISCRETE.
fn next_positional(
    entries: &mut VecDeque<Entry>,
    stop_spec: &BlockSpec,
    kind: ParamKind,
) -> Option<Param> {
    let is_value = matches!(
        entries.front(),
        Some(Entry::Param(param)) if convert_value(&param.value, kind).is_some()
    );
    if !is_value {
        return next_param(entries, stop_spec);
    }
    match entries.pop_front()? {
        Entry::Param(param) => Some(param),
        Entry::Block(_) => None,
    }
}

// the next entry, if it is a parameter that belongs to the current keyword
fn next_param(entries: &mut VecDeque<Entry>, stop_spec: &BlockSpec) -> Option<Param> {
    if at_stop(entries, stop_spec) {
        return None;
    }
    match entries.pop_front()? {
        Entry::Param(param) => Some(param),
        entry @ Entry::Block(_) => {
            entries.push_front(entry);
            None
        }
    }
}

// Parameters stop at a block or at a keyword that is permitted in the enclosing block
fn at_stop(entries: &VecDeque<Entry>, stop_spec: &BlockSpec) -> bool {
    match entries.front() {
        None | Some(Entry::Block(_)) => true,
        Some(Entry::Param(Param {
            value: RawValue::Identifier(name),
            ..
        })) => stop_spec.permits(name),
        Some(Entry::Param(_)) => false,
    }
}

fn next_location(entries: &VecDeque<Entry>) -> Option<Location> {
    match entries.front()? {
        Entry::Param(param) => Some(param.location),
        Entry::Block(block) => Some(block.location),
    }
}

// convert_param()
// Check a parameter against its declared kind. A mismatch is reported and None is returned.
fn convert_param(
    param: &Param,
    param_spec: &ParamSpec,
    sink: &mut DiagnosticSink,
) -> Result<Option<Value>, A2lError> {
    if let Some(value) = convert_value(&param.value, param_spec.kind) {
        return Ok(Some(value));
    }
    sink.schema_violation(
        param.location,
        format!(
            "expected {} for parameter \"{}\", found \"{}\"",
            describe_kind(param_spec.kind),
            param_spec.name,
            raw_text(&param.value)
        ),
    )?;
    Ok(None)
}

fn convert_value(value: &RawValue, kind: ParamKind) -> Option<Value> {
    match (kind, value) {
        (ParamKind::Ident, RawValue::Identifier(text)) => Some(Value::Ident(text.clone())),
        (ParamKind::String, RawValue::String(text)) => Some(Value::Text(text.clone())),
        (ParamKind::Int(int_type) | ParamKind::Hex(int_type), RawValue::Number(text)) => {
            parse_int_type(text, int_type).map(Value::Int)
        }
        (ParamKind::Float, RawValue::Number(text)) => parse_float(text).map(Value::Float),
        (ParamKind::Enum(tags), RawValue::Identifier(text)) if tags.contains(&text.as_str()) => {
            Some(Value::Ident(text.clone()))
        }
        (ParamKind::Verbatim, RawValue::Verbatim(text)) => Some(Value::Verbatim(text.clone())),
        _ => None,
    }
}

fn default_value(param_spec: &ParamSpec) -> Value {
    match param_spec.kind {
        ParamKind::Ident | ParamKind::Enum(_) => Value::Ident(String::new()),
        ParamKind::String => Value::Text(String::new()),
        ParamKind::Int(_) | ParamKind::Hex(_) => Value::Int(param_spec.default.unwrap_or(0)),
        ParamKind::Float => Value::Float(0.0),
        ParamKind::Verbatim => Value::Verbatim(String::new()),
    }
}

fn describe_kind(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::Ident => "identifier",
        ParamKind::String => "string",
        ParamKind::Int(_) | ParamKind::Hex(_) => "integer",
        ParamKind::Float => "float",
        ParamKind::Enum(_) => "enumeration value",
        ParamKind::Verbatim => "A2ML text",
    }
}

fn raw_text(value: &RawValue) -> &str {
    match value {
        RawValue::Identifier(text)
        | RawValue::String(text)
        | RawValue::Number(text)
        | RawValue::Verbatim(text) => text,
    }
}

// content of unknown blocks is kept without any checks
fn raw_block(block: GenericBlock) -> RawBlock {
    let entries = merge_entries(block.params, block.children);
    RawBlock {
        tag: block.tag,
        is_block: true,
        content: entries.into_iter().map(raw_item).collect(),
    }
}

fn raw_item(entry: Entry) -> RawItem {
    match entry {
        Entry::Param(param) => RawItem::Value(param.value),
        Entry::Block(block) => RawItem::Block(raw_block(block)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, DiagnosticKind};
    use crate::parser::parse_blocks;

    fn build(text: &str) -> (A2lFile, Vec<Diagnostic>) {
        let mut sink = DiagnosticSink::new(None);
        let root = parse_blocks(text, &mut sink).unwrap();
        let a2l_file = build_file(root, &mut sink).unwrap();
        (a2l_file, sink.into_diagnostics())
    }

    fn wrap(module_content: &str) -> String {
        format!(
            "ASAP2_VERSION 1 71\n/begin PROJECT p \"\"\n/begin MODULE m \"\"\n{module_content}\n/end MODULE\n/end PROJECT\n"
        )
    }

    fn messages(diagnostics: &[Diagnostic]) -> Vec<&str> {
        diagnostics.iter().map(|diag| diag.message.as_str()).collect()
    }

    #[test]
    fn minimal_file() {
        let (a2l_file, diagnostics) = build(&wrap(""));
        assert!(diagnostics.is_empty());
        let version = a2l_file.asap2_version.unwrap();
        assert_eq!(version.version_no, 1);
        assert_eq!(version.upgrade_no, 71);
        assert_eq!(a2l_file.project.name, "p");
        assert_eq!(a2l_file.project.module[0].name, "m");
    }

    #[test]
    fn measurement_with_keywords() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "long" SWORD NO_COMPU_METHOD 1 0.5 -100 100.5
  ECU_ADDRESS 0x1234
  MATRIX_DIM 7 8 10
  FORMAT "%6.2"
  DISCRETE
  /begin FUNCTION_LIST f1 f2 /end FUNCTION_LIST
/end MEASUREMENT"#,
        ));
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.name, "meas");
        assert_eq!(measurement.lower_limit, -100.0);
        assert_eq!(measurement.upper_limit, 100.5);
        assert_eq!(measurement.ecu_address, Some(0x1234));
        let matrix_dim = measurement.matrix_dim.as_ref().unwrap();
        assert_eq!(
            (matrix_dim.x_dim, matrix_dim.y_dim, matrix_dim.z_dim),
            (7, 8, 10)
        );
        assert_eq!(measurement.format.as_deref(), Some("%6.2"));
        assert!(measurement.discrete);
        assert_eq!(
            measurement.function_list,
            Some(vec!["f1".to_string(), "f2".to_string()])
        );
    }

    #[test]
    fn matrix_dim_defaults() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 MATRIX_DIM 4 /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec![
                r#"MATRIX_DIM: parameter "y_dim" is missing"#,
                r#"MATRIX_DIM: parameter "z_dim" is missing"#
            ]
        );
        let matrix_dim = a2l_file.project.module[0].measurement[0]
            .matrix_dim
            .clone()
            .unwrap();
        assert_eq!(
            (matrix_dim.x_dim, matrix_dim.y_dim, matrix_dim.z_dim),
            (4, 1, 1)
        );

        // a fourth value is not part of MATRIX_DIM
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 MATRIX_DIM 2 3 4 5 /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec!["unexpected parameter 5 in MEASUREMENT"]
        );
        let matrix_dim = a2l_file.project.module[0].measurement[0]
            .matrix_dim
            .clone()
            .unwrap();
        assert_eq!(
            (matrix_dim.x_dim, matrix_dim.y_dim, matrix_dim.z_dim),
            (2, 3, 4)
        );
    }

    #[test]
    fn missing_parameter() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 FORMAT "%4.1" /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec![r#"MEASUREMENT: parameter "upper_limit" is missing"#]
        );
        assert_eq!(diagnostics[0].kind, DiagnosticKind::SchemaViolation);
        // the keyword after the missing parameter is still found
        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.upper_limit, 0.0);
        assert_eq!(measurement.format.as_deref(), Some("%4.1"));
    }

    #[test]
    fn wrong_parameter_type() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 abc 0 1 /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec![r#"expected float for parameter "accuracy", found "abc""#]
        );
        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.accuracy, 0.0);
        assert_eq!(measurement.upper_limit, 1.0);
    }

    #[test]
    fn integer_ranges() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 70000 0 0 1 ECU_ADDRESS_EXTENSION 0xFFFF /end MEASUREMENT"#,
        ));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.contains("resolution"));
        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.resolution, 0);
        // hex with the high bit set is sign extended
        assert_eq!(measurement.ecu_address_extension, Some(-1));
    }

    #[test]
    fn value_table_rows() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin COMPU_VTAB vt "" TAB_VERB 3
  0 "zero"
  1 "one"
  DEFAULT_VALUE "other"
/end COMPU_VTAB"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec!["COMPU_VTAB: declared 3 value rows, found 2"]
        );
        let compu_vtab = &a2l_file.project.module[0].compu_vtab[0];
        assert_eq!(compu_vtab.value_pairs.len(), 2);
        assert_eq!(compu_vtab.value_pairs[1].out_val, "one");
        assert_eq!(compu_vtab.default_value.as_deref(), Some("other"));
        assert_eq!(compu_vtab.number_value_pairs, 3);
    }

    #[test]
    fn invalid_rows() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin COMPU_VTAB vt "" TAB_VERB 2 0 "zero" 1 2 /end COMPU_VTAB"#,
        ));
        // the row 1 2 has a number in place of a string and is dropped
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics[0].message,
            r#"expected string for parameter "out_val", found "2""#
        );
        assert_eq!(
            a2l_file.project.module[0].compu_vtab[0].value_pairs.len(),
            1
        );

        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin COMPU_TAB t "" TAB_NOINTP 2 0 1 2 /end COMPU_TAB"#,
        ));
        // partial row: filled with defaults
        assert_eq!(
            messages(&diagnostics),
            vec![r#"COMPU_TAB: incomplete row, parameter "out_val" is missing"#]
        );
        let compu_tab = &a2l_file.project.module[0].compu_tab[0];
        assert_eq!(compu_tab.tab_entry.len(), 2);
        assert_eq!(compu_tab.tab_entry[1].in_val, 2.0);
        assert_eq!(compu_tab.tab_entry[1].out_val, 0.0);
    }

    #[test]
    fn multiplicity() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 FORMAT "a" FORMAT "b" /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec!["FORMAT may only occur once in MEASUREMENT"]
        );
        // the first occurrence is kept
        assert_eq!(
            a2l_file.project.module[0].measurement[0].format.as_deref(),
            Some("a")
        );

        let (_, diagnostics) = build("ASAP2_VERSION 1 71");
        assert_eq!(messages(&diagnostics), vec!["missing required PROJECT in A2L_FILE"]);

        let (_, diagnostics) = build(r#"/begin PROJECT p "" /end PROJECT"#);
        assert_eq!(messages(&diagnostics), vec!["missing required MODULE in PROJECT"]);
    }

    #[test]
    fn duplicate_names() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT x "" UBYTE cm 1 0 0 1 /end MEASUREMENT
/begin MEASUREMENT x "" UWORD cm 1 0 0 1 /end MEASUREMENT
/begin CHARACTERISTIC x "" VALUE 0x100 rl 0 cm 0 1 /end CHARACTERISTIC"#,
        ));
        // names only need to be unique within their own list
        assert_eq!(
            messages(&diagnostics),
            vec![r#"duplicate MEASUREMENT name "x" in MODULE"#]
        );
        assert_eq!(diagnostics[0].location.line, 5);
        let module = &a2l_file.project.module[0];
        assert_eq!(module.measurement.len(), 2);
        assert_eq!(module.characteristic.len(), 1);
    }

    #[test]
    fn wrong_form() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 /begin FORMAT "%x" /end FORMAT /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec!["FORMAT must be written as a keyword"]
        );
        assert_eq!(
            a2l_file.project.module[0].measurement[0].format.as_deref(),
            Some("%x")
        );
    }

    #[test]
    fn unknown_keywords() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1
  VENDOR_FLAG 1 "two" FORMAT "%d"
  /begin VENDOR_BLOCK x /begin INNER /end INNER /end VENDOR_BLOCK
/end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec![
                "unknown keyword VENDOR_FLAG in MEASUREMENT",
                "unknown keyword VENDOR_BLOCK in MEASUREMENT"
            ]
        );
        assert!(
            diagnostics
                .iter()
                .all(|diag| diag.kind == DiagnosticKind::UnknownKeyword)
        );

        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.format.as_deref(), Some("%d"));
        assert_eq!(measurement.unknown.len(), 2);
        let flag = &measurement.unknown[0];
        assert_eq!(flag.tag, "VENDOR_FLAG");
        assert!(!flag.is_block);
        assert_eq!(
            flag.content,
            vec![
                RawItem::Value(RawValue::Number("1".to_string())),
                RawItem::Value(RawValue::String("two".to_string()))
            ]
        );
        let block = &measurement.unknown[1];
        assert!(block.is_block);
        assert_eq!(block.params().count(), 1);
        assert_eq!(block.blocks().next().unwrap().tag, "INNER");
    }

    #[test]
    fn stray_parameter() {
        let (_, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 42 /end MEASUREMENT"#,
        ));
        assert_eq!(
            messages(&diagnostics),
            vec!["unexpected parameter 42 in MEASUREMENT"]
        );
    }

    #[test]
    fn opaque_if_data() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin IF_DATA XCP 1 "text" IDENT
  /begin SEGMENT 0x10 /begin PAGE /end PAGE /end SEGMENT
/end IF_DATA"#,
        ));
        assert!(diagnostics.is_empty());
        let if_data = &a2l_file.project.module[0].if_data[0];
        assert_eq!(if_data.name, "XCP");
        assert_eq!(if_data.content.len(), 4);
        let RawItem::Block(segment) = &if_data.content[3] else {
            panic!("expected a block");
        };
        assert_eq!(segment.tag, "SEGMENT");
        assert_eq!(segment.blocks().next().unwrap().tag, "PAGE");
    }

    #[test]
    fn raw_content_order() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin IF_DATA XCP
  /begin PROTOCOL_LAYER 1 /end PROTOCOL_LAYER
  EVENT 1 /begin DAQ_EVENT 2 /end DAQ_EVENT 3
/end IF_DATA"#,
        ));
        assert!(diagnostics.is_empty());
        let content = &a2l_file.project.module[0].if_data[0].content;
        let kinds: Vec<&str> = content
            .iter()
            .map(|item| match item {
                RawItem::Value(_) => "value",
                RawItem::Block(_) => "block",
            })
            .collect();
        assert_eq!(kinds, vec!["block", "value", "value", "block", "value"]);
        let RawItem::Block(protocol_layer) = &content[0] else {
            panic!("expected a block");
        };
        assert_eq!(protocol_layer.tag, "PROTOCOL_LAYER");
        assert_eq!(
            protocol_layer.content,
            vec![RawItem::Value(RawValue::Number("1".to_string()))]
        );

        // unknown blocks keep the order of their content as well
        let (a2l_file, _) = build(&wrap(
            "/begin VENDOR_BLOCK /begin A /end A x /begin B /end B /end VENDOR_BLOCK",
        ));
        let vendor = &a2l_file.project.module[0].unknown[0];
        assert!(matches!(&vendor.content[0], RawItem::Block(block) if block.tag == "A"));
        assert_eq!(
            vendor.content[1],
            RawItem::Value(RawValue::Identifier("x".to_string()))
        );
        assert!(matches!(&vendor.content[2], RawItem::Block(block) if block.tag == "B"));
    }

    #[test]
    fn names_that_are_keywords() {
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT DISCRETE "" UBYTE FORMAT 1 0 0 1 DISCRETE /end MEASUREMENT
/begin CHARACTERISTIC NUMBER "" VALUE 0x100 NUMBER 0 FORMAT 0 1 NUMBER 4 /end CHARACTERISTIC
/begin GROUP ROOT "" ROOT /end GROUP"#,
        ));
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        let module = &a2l_file.project.module[0];
        let measurement = &module.measurement[0];
        assert_eq!(measurement.name, "DISCRETE");
        assert_eq!(measurement.conversion, "FORMAT");
        assert_eq!(measurement.upper_limit, 1.0);
        assert!(measurement.discrete);
        let characteristic = &module.characteristic[0];
        assert_eq!(characteristic.name, "NUMBER");
        assert_eq!(characteristic.deposit, "NUMBER");
        assert_eq!(characteristic.conversion, "FORMAT");
        assert_eq!(characteristic.number, Some(4));
        assert_eq!(module.group[0].group_name, "ROOT");
        assert!(module.group[0].root);

        // a keyword in place of a number still ends the parameters
        let (a2l_file, diagnostics) = build(&wrap(
            r#"/begin MEASUREMENT meas "" UBYTE cm 1 0 0 1 MATRIX_DIM 4 FORMAT "%d" /end MEASUREMENT"#,
        ));
        assert_eq!(diagnostics.len(), 2);
        let measurement = &a2l_file.project.module[0].measurement[0];
        assert_eq!(measurement.format.as_deref(), Some("%d"));
        assert_eq!(measurement.matrix_dim.as_ref().unwrap().x_dim, 4);
    }

    #[test]
    fn a2ml_block() {
        let (a2l_file, diagnostics) =
            build(&wrap("/begin A2ML\n  block \"IF_DATA\" struct { uint; };\n/end A2ML"));
        assert!(diagnostics.is_empty());
        assert_eq!(
            a2l_file.project.module[0].a2ml.as_ref().unwrap().text,
            "\n  block \"IF_DATA\" struct { uint; };"
        );
    }

    #[test]
    fn entries_in_source_order() {
        let mut sink = DiagnosticSink::new(None);
        let root = parse_blocks("/begin X a /begin Y /end Y b /end X", &mut sink).unwrap();
        let block = root.children.into_iter().next().unwrap();
        let entries = merge_entries(block.params, block.children);
        let is_block: Vec<bool> = entries
            .iter()
            .map(|entry| matches!(entry, Entry::Block(_)))
            .collect();
        assert_eq!(is_block, vec![false, true, false]);
    }
}

use std::fmt::Write;
use tracing::debug;

use crate::blockdata::{A2lObject, BlockData, Item, Value};
use crate::literal::encode_string;
use crate::model::{A2lFile, RawBlock, RawItem, RawValue};
use crate::specification::{BlockSpec, ParamKind, lookup};

#[derive(Debug)]
pub(crate) struct Writer {
    indent: usize,
    outstring: String,
}

// write_a2l()
// Generate the a2l text of a file. Every entity is converted to its block data, which is
// then written according to the schema table.
pub(crate) fn write_a2l(a2l_file: &A2lFile) -> String {
    let data = a2l_file.to_data();
    let mut writer = Writer::new(0);
    // the implicit file block has no /begin and /end of its own
    writer.add_items(&data.items, lookup(data.tag));
    let text = writer.finish();
    debug!(bytes = text.len(), "generated a2l text");
    text
}

impl Writer {
    pub(crate) fn new(indent: usize) -> Self {
        Self {
            indent,
            /* using an initial capacity of 1024 means that usually only MODULE will have to
            reallocate while adding elements. */
            outstring: String::with_capacity(1024),
        }
    }

    // add a string to the output, separated from the previous output by a space
    pub(crate) fn add_str(&mut self, text: &str) {
        self.outstring.push(' ');
        self.outstring.push_str(text);
    }

    // add a string to the output, prefixed with whitespace only if the string does not already contain any
    // this is used to write A2ML blocks
    pub(crate) fn add_str_raw(&mut self, text: &str) {
        if !text.is_empty() && !text.starts_with(|c: char| c.is_whitespace()) {
            self.outstring.push(' ');
        }
        self.outstring.push_str(text);
    }

    pub(crate) fn add_quoted_string(&mut self, value: &str) {
        self.outstring.push_str(" \"");
        self.outstring.push_str(&encode_string(value));
        self.outstring.push('"');
    }

    pub(crate) fn add_integer(&mut self, value: i128, is_hex: bool) {
        // hex output is only used for addresses and masks, which are never negative
        if is_hex && value >= 0 {
            let _ = write!(self.outstring, " 0x{value:X}");
        } else {
            let _ = write!(self.outstring, " {value}");
        }
    }

    // add_float()
    // Rust formats floats with the shortest text that parses back to the same value.
    // Very large and very small values use scientific notation.
    pub(crate) fn add_float(&mut self, value: f64) {
        if value == 0f64 {
            if value.is_sign_negative() {
                self.outstring.push_str(" -0");
            } else {
                self.outstring.push_str(" 0");
            }
        } else if (1e-4..1e10).contains(&value.abs()) {
            let _ = write!(self.outstring, " {value}");
        } else {
            let _ = write!(self.outstring, " {value:e}");
        }
    }

    fn add_value(&mut self, value: &Value, kind: Option<ParamKind>) {
        match value {
            // an empty identifier has no text form; "" keeps the following values in place
            Value::Ident(text) if text.is_empty() => self.add_quoted_string(""),
            Value::Ident(text) => self.add_str(text),
            Value::Text(text) => self.add_quoted_string(text),
            Value::Int(number) => {
                self.add_integer(*number, matches!(kind, Some(ParamKind::Hex(_))));
            }
            Value::Float(number) => self.add_float(*number),
            Value::Verbatim(text) => self.add_str_raw(text),
        }
    }

    fn add_raw_value(&mut self, value: &RawValue) {
        match value {
            RawValue::Identifier(text) | RawValue::Number(text) => self.add_str(text),
            RawValue::String(text) => self.add_quoted_string(text),
            RawValue::Verbatim(text) => self.add_str_raw(text),
        }
    }

    // add_items()
    // Children are written in the order of the schema table; items with the same keyword keep
    // their relative order, and unknown blocks go last.
    fn add_items(&mut self, items: &[Item], spec: Option<&BlockSpec>) {
        let mut sorted: Vec<&Item> = items.iter().collect();
        sorted.sort_by_key(|item| match item {
            Item::Typed(child) => spec
                .and_then(|spec| spec.child_position(child.tag))
                .unwrap_or(usize::MAX - 1),
            Item::Raw(_) => usize::MAX,
        });

        for item in sorted {
            match item {
                Item::Typed(child) => self.add_block_data(child),
                Item::Raw(raw) => self.add_raw_block(raw, raw.is_block),
            }
        }
    }

    fn add_block_data(&mut self, data: &BlockData) {
        let spec = lookup(data.tag);
        let is_block = spec.map_or(!data.items.is_empty(), |spec| spec.is_block);

        self.add_whitespace();
        if is_block {
            self.outstring.push_str("/begin ");
        }
        self.outstring.push_str(data.tag);
        for (idx, value) in data.params.iter().enumerate() {
            let kind = spec.and_then(|spec| spec.params.get(idx)).map(|param| param.kind);
            self.add_value(value, kind);
        }

        self.indent += 1;
        self.add_raw_content(&data.raw_content);
        for row in &data.rows {
            // in blocks every row gets its own line; keywords are written on a single line
            let mut row_start = None;
            if is_block {
                self.add_whitespace();
                row_start = Some(self.outstring.len());
            }
            for (idx, value) in row.iter().enumerate() {
                let kind = spec.and_then(|spec| spec.tail.get(idx)).map(|param| param.kind);
                self.add_value(value, kind);
            }
            if let Some(pos) = row_start {
                // no separator at the start of a line
                if self.outstring[pos..].starts_with(' ') {
                    self.outstring.remove(pos);
                }
            }
        }
        self.add_items(&data.items, spec);
        self.indent -= 1;

        if is_block {
            self.add_whitespace();
            self.outstring.push_str("/end ");
            self.outstring.push_str(data.tag);
        }
    }

    // add_raw_block()
    // Only a raw block at the top can be a keyword without /begin and /end. Nested content
    // has no schema, so a nested keyword could not be told apart from the parameters.
    fn add_raw_block(&mut self, raw: &RawBlock, is_block: bool) {
        self.add_whitespace();
        if is_block {
            self.outstring.push_str("/begin ");
        }
        self.outstring.push_str(&raw.tag);

        self.indent += 1;
        self.add_raw_content(&raw.content);
        self.indent -= 1;

        if is_block {
            self.add_whitespace();
            self.outstring.push_str("/end ");
            self.outstring.push_str(&raw.tag);
        }
    }

    // add_raw_content()
    // Values follow the keyword on its line; each nested block starts a new line, and values
    // after a nested block continue on a new line as well.
    fn add_raw_content(&mut self, content: &[RawItem]) {
        let mut after_block = false;
        for item in content {
            match item {
                RawItem::Value(value) => {
                    if after_block {
                        self.add_whitespace();
                        let pos = self.outstring.len();
                        self.add_raw_value(value);
                        // no separator at the start of a line
                        if self.outstring[pos..].starts_with(' ') {
                            self.outstring.remove(pos);
                        }
                        after_block = false;
                    } else {
                        self.add_raw_value(value);
                    }
                }
                RawItem::Block(block) => {
                    self.add_raw_block(block, true);
                    after_block = true;
                }
            }
        }
    }

    // start a new line at the current indentation level
    fn add_whitespace(&mut self) {
        self.outstring.push('\n');
        for _ in 0..self.indent {
            self.outstring.push_str("  ");
        }
    }

    pub(crate) fn finish(self) -> String {
        let mut text = self.outstring;
        if text.starts_with('\n') {
            text.remove(0);
        }
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::load_from_string;
    use crate::model::{A2ml, Measurement, Module};

    fn write_float(value: f64) -> String {
        let mut writer = Writer::new(0);
        writer.add_float(value);
        writer.outstring
    }

    #[test]
    fn write_str_raw() {
        let mut writer = Writer::new(2);
        writer.add_str_raw(" has leading whitespace");
        assert_eq!(writer.outstring, " has leading whitespace");

        let mut writer = Writer::new(2);
        writer.add_str_raw("no leading whitspace");
        assert_eq!(writer.outstring, " no leading whitspace");
    }

    #[test]
    fn write_quoted_string() {
        let mut writer = Writer::new(2);
        writer.add_quoted_string("test:\rabc\ndef\tghi\'jkl\"nmo\\pqr");
        assert_eq!(
            writer.outstring,
            r#" "test:\rabc\ndef\tghi\'jkl\"nmo\\pqr""#
        );
    }

    #[test]
    fn write_integer() {
        let mut writer = Writer::new(2);
        writer.add_integer(123, false);
        assert_eq!(writer.outstring, " 123");

        let mut writer = Writer::new(2);
        writer.add_integer(123, true);
        assert_eq!(writer.outstring, " 0x7B");

        let mut writer = Writer::new(2);
        writer.add_integer(-5, true);
        assert_eq!(writer.outstring, " -5");
    }

    #[test]
    fn write_float_values() {
        assert_eq!(write_float(123.456), " 123.456");
        assert_eq!(write_float(100.0), " 100");
        assert_eq!(write_float(-2.5), " -2.5");
        // very small value -> scientific notation
        assert_eq!(write_float(0.0000123456), " 1.23456e-5");
        // very large value -> scientific notation
        assert_eq!(write_float(123456000000.0), " 1.23456e11");
        assert_eq!(write_float(0.0), " 0");
        assert_eq!(write_float(-0.0), " -0");
        // the shortest representation is used, and it parses back to the same value
        let value = 0.1 + 0.2;
        let text = write_float(value);
        assert_eq!(text.trim().parse::<f64>().unwrap(), value);
    }

    #[test]
    fn write_file() {
        let text = r#"ASAP2_VERSION 1 71
/begin PROJECT p "project"
  /begin MODULE m ""
    /begin MEASUREMENT meas "" UWORD cm 1 0 0 100
      ECU_ADDRESS 0x1000
      FORMAT "%6.2"
    /end MEASUREMENT
  /end MODULE
/end PROJECT
"#;
        let (a2l_file, diagnostics) = load_from_string(text).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(write_a2l(&a2l_file), text);
    }

    #[test]
    fn canonical_child_order() {
        let mut module = Module::new("m", "");
        let mut measurement = Measurement::new("meas", crate::model::DataType::Ubyte, "cm");
        measurement.format = Some("%4.0".to_string());
        measurement.unknown.push(RawBlock::new("VENDOR_FLAG", false));
        measurement.ecu_address = Some(0xFF);
        module.measurement.push(measurement);
        let mut a2l_file = crate::new();
        a2l_file.project.module[0] = module;

        let text = write_a2l(&a2l_file);
        let address = text.find("ECU_ADDRESS").unwrap();
        let format = text.find("FORMAT").unwrap();
        let vendor = text.find("VENDOR_FLAG").unwrap();
        assert!(address < format && format < vendor);
    }

    #[test]
    fn write_rows_and_lists() {
        let text = r#"/begin PROJECT p ""
  /begin MODULE m ""
    /begin COMPU_VTAB vt "" TAB_VERB 2
      0 "off"
      1 "on"
      DEFAULT_VALUE "unknown"
    /end COMPU_VTAB
    /begin FUNCTION f ""
      /begin IN_MEASUREMENT
        a
        b
      /end IN_MEASUREMENT
    /end FUNCTION
  /end MODULE
/end PROJECT
"#;
        let (a2l_file, diagnostics) = load_from_string(text).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(write_a2l(&a2l_file), text);
    }

    #[test]
    fn write_a2ml() {
        let mut a2l_file = crate::new();
        a2l_file.project.module[0].a2ml = Some(A2ml {
            text: "\n  struct Foo { uint; };".to_string(),
        });
        let text = write_a2l(&a2l_file);
        assert!(text.contains("    /begin A2ML\n  struct Foo { uint; };\n    /end A2ML"));

        let (reloaded, _) = load_from_string(&text).unwrap();
        assert_eq!(reloaded, a2l_file);
    }

    #[test]
    fn write_raw_blocks() {
        let mut raw = RawBlock::new("VENDOR", true);
        raw.content.push(RawValue::String("a \"b\"".to_string()).into());
        let mut inner = RawBlock::new("INNER", false);
        inner.content.push(RawValue::Number("0x10".to_string()).into());
        raw.content.push(inner.into());
        raw.content.push(RawValue::Identifier("after".to_string()).into());

        let mut writer = Writer::new(0);
        writer.add_raw_block(&raw, raw.is_block);
        // the nested keyword is written as a block, so that it stays separate from the values
        assert_eq!(
            writer.finish(),
            "/begin VENDOR \"a \\\"b\\\"\"\n  /begin INNER 0x10\n  /end INNER\n  after\n/end VENDOR\n"
        );

        let mut flag = RawBlock::new("VENDOR_FLAG", false);
        flag.content.push(RawValue::Number("1".to_string()).into());
        let mut writer = Writer::new(0);
        writer.add_raw_block(&flag, flag.is_block);
        assert_eq!(writer.finish(), "VENDOR_FLAG 1\n");
    }

    #[test]
    fn nested_raw_keyword_reload() {
        let mut vendor = RawBlock::new("VENDOR", true);
        let mut inner = RawBlock::new("INNER", false);
        inner.content.push(RawValue::Number("0x10".to_string()).into());
        vendor.content.push(inner.into());
        vendor.content.push(RawValue::Number("2".to_string()).into());
        let mut a2l_file = crate::new();
        a2l_file.project.module[0].unknown.push(vendor);

        let (reloaded, _) = load_from_string(&write_a2l(&a2l_file)).unwrap();
        let vendor = &reloaded.project.module[0].unknown[0];
        assert_eq!(vendor.content.len(), 2);
        let RawItem::Block(inner) = &vendor.content[0] else {
            panic!("expected a nested block");
        };
        assert_eq!(inner.tag, "INNER");
        assert_eq!(
            inner.content,
            vec![RawItem::Value(RawValue::Number("0x10".to_string()))]
        );
        assert_eq!(
            vendor.content[1],
            RawItem::Value(RawValue::Number("2".to_string()))
        );
    }

    #[test]
    fn write_if_data_in_order() {
        let text = r#"/begin PROJECT p ""
  /begin MODULE m ""
    /begin IF_DATA XCP
      /begin PROTOCOL_LAYER 1
      /end PROTOCOL_LAYER
      EVENT 1 "10ms"
    /end IF_DATA
  /end MODULE
/end PROJECT
"#;
        let (a2l_file, diagnostics) = load_from_string(text).unwrap();
        assert!(diagnostics.is_empty(), "{diagnostics:?}");
        assert_eq!(write_a2l(&a2l_file), text);
    }

    #[test]
    fn write_empty_identifier() {
        let mut a2l_file = crate::new();
        let measurement = Measurement::new("", crate::model::DataType::Uword, "cm");
        a2l_file.project.module[0].measurement.push(measurement);

        let text = write_a2l(&a2l_file);
        assert!(text.contains(r#"/begin MEASUREMENT "" "" UWORD cm"#));

        // the other parameters keep their positions
        let (reloaded, diagnostics) = load_from_string(&text).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(reloaded, a2l_file);
    }
}

use num_traits::NumCast;

use crate::model::{A2lEnum, RawBlock, RawItem};

// Value
// A validated parameter. The builder has already checked it against the ParamKind of the
// schema, so entities can convert it without further error handling.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Ident(String),
    Text(String),
    Int(i128),
    Float(f64),
    Verbatim(String),
}

// Item
// A child of a block: either a keyword from the schema table, or a raw block that keeps
// an unrecognized keyword
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Item {
    Typed(BlockData),
    Raw(RawBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BlockData {
    pub(crate) tag: &'static str,
    pub(crate) params: Vec<Value>,
    pub(crate) rows: Vec<Vec<Value>>,
    pub(crate) items: Vec<Item>,
    // uninterpreted content of opaque blocks (IF_DATA), in source order
    pub(crate) raw_content: Vec<RawItem>,
}

/// Conversion between a typed entity and its generic block data.
///
/// `from_data` only receives data that was validated against the schema table,
/// so it cannot fail; `to_data` produces the parameters in schema order.
pub(crate) trait A2lObject: Sized {
    const TAG: &'static str;

    fn from_data(data: BlockData) -> Self;

    fn to_data(&self) -> BlockData;
}

impl Value {
    pub(crate) fn ident(text: &str) -> Self {
        Value::Ident(text.to_string())
    }

    pub(crate) fn text(text: &str) -> Self {
        Value::Text(text.to_string())
    }

    pub(crate) fn int<T: Into<i128>>(value: T) -> Self {
        Value::Int(value.into())
    }

    pub(crate) fn enumeration<E: A2lEnum>(value: E) -> Self {
        Value::Ident(value.tag().to_string())
    }

    pub(crate) fn take_text(&mut self) -> String {
        match self {
            Value::Ident(text) | Value::Text(text) | Value::Verbatim(text) => std::mem::take(text),
            Value::Int(_) | Value::Float(_) => String::new(),
        }
    }

    pub(crate) fn to_int<T: NumCast + Default>(&self) -> T {
        match self {
            Value::Int(value) => <T as NumCast>::from(*value).unwrap_or_default(),
            _ => T::default(),
        }
    }

    pub(crate) fn to_float(&self) -> f64 {
        match self {
            Value::Float(value) => *value,
            Value::Int(value) => *value as f64,
            _ => 0.0,
        }
    }

    pub(crate) fn to_enum<E: A2lEnum>(&self) -> E {
        match self {
            Value::Ident(tag) => E::from_tag(tag).unwrap_or_default(),
            _ => E::default(),
        }
    }
}

impl BlockData {
    pub(crate) fn new(tag: &'static str) -> Self {
        Self {
            tag,
            params: Vec::new(),
            rows: Vec::new(),
            items: Vec::new(),
            raw_content: Vec::new(),
        }
    }

    /// create a block with the given parameters and no content
    pub(crate) fn with_params(tag: &'static str, params: Vec<Value>) -> Self {
        Self {
            params,
            ..Self::new(tag)
        }
    }

    // ---------------------------------------------------------------------------------
    // accessors used by from_data(); missing values read as the default

    pub(crate) fn text(&mut self, idx: usize) -> String {
        self.params
            .get_mut(idx)
            .map(Value::take_text)
            .unwrap_or_default()
    }

    pub(crate) fn int<T: NumCast + Default>(&self, idx: usize) -> T {
        self.params
            .get(idx)
            .map(Value::to_int)
            .unwrap_or_default()
    }

    pub(crate) fn float(&self, idx: usize) -> f64 {
        self.params.get(idx).map_or(0.0, Value::to_float)
    }

    pub(crate) fn enumeration<E: A2lEnum>(&self, idx: usize) -> E {
        self.params
            .get(idx)
            .map(Value::to_enum)
            .unwrap_or_default()
    }

    /// the first column of each tail row, as text
    pub(crate) fn text_list(&mut self) -> Vec<String> {
        self.rows
            .iter_mut()
            .filter_map(|row| row.first_mut().map(Value::take_text))
            .collect()
    }

    /// the first column of each tail row, as float
    pub(crate) fn float_list(&self) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.first().map(Value::to_float))
            .collect()
    }

    pub(crate) fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    // ---------------------------------------------------------------------------------
    // builders used by to_data()

    pub(crate) fn add_child(&mut self, child: BlockData) {
        self.items.push(Item::Typed(child));
    }

    pub(crate) fn add_object<T: A2lObject>(&mut self, object: Option<&T>) {
        if let Some(object) = object {
            self.add_child(object.to_data());
        }
    }

    pub(crate) fn add_objects<'a, T, I>(&mut self, objects: I)
    where
        T: A2lObject + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        for object in objects {
            self.add_child(object.to_data());
        }
    }

    pub(crate) fn add_flag(&mut self, tag: &'static str, is_set: bool) {
        if is_set {
            self.add_child(BlockData::new(tag));
        }
    }

    pub(crate) fn add_text(&mut self, tag: &'static str, value: Option<&String>) {
        if let Some(value) = value {
            self.add_child(BlockData::with_params(tag, vec![Value::text(value)]));
        }
    }

    pub(crate) fn add_ident(&mut self, tag: &'static str, value: Option<&String>) {
        if let Some(value) = value {
            self.add_child(BlockData::with_params(tag, vec![Value::ident(value)]));
        }
    }

    pub(crate) fn add_int<T: Into<i128> + Copy>(&mut self, tag: &'static str, value: Option<T>) {
        if let Some(value) = value {
            self.add_child(BlockData::with_params(tag, vec![Value::int(value)]));
        }
    }

    pub(crate) fn add_float(&mut self, tag: &'static str, value: Option<f64>) {
        if let Some(value) = value {
            self.add_child(BlockData::with_params(tag, vec![Value::Float(value)]));
        }
    }

    pub(crate) fn add_enum<E: A2lEnum>(&mut self, tag: &'static str, value: Option<E>) {
        if let Some(value) = value {
            self.add_child(BlockData::with_params(tag, vec![Value::enumeration(value)]));
        }
    }

    /// an identifier list block such as `FUNCTION_LIST`
    pub(crate) fn add_ident_list(&mut self, tag: &'static str, list: Option<&Vec<String>>) {
        if let Some(list) = list {
            let mut child = BlockData::new(tag);
            child.rows = list.iter().map(|name| vec![Value::ident(name)]).collect();
            self.add_child(child);
        }
    }

    pub(crate) fn add_float_list(&mut self, tag: &'static str, list: Option<&Vec<f64>>) {
        if let Some(list) = list {
            let mut child = BlockData::new(tag);
            child.rows = list.iter().map(|value| vec![Value::Float(*value)]).collect();
            self.add_child(child);
        }
    }

    pub(crate) fn add_raw(&mut self, raw_blocks: &[RawBlock]) {
        self.items
            .extend(raw_blocks.iter().cloned().map(Item::Raw));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DataType;

    #[test]
    fn accessors() {
        let mut data = BlockData::with_params(
            "TEST",
            vec![
                Value::ident("name"),
                Value::Int(-1),
                Value::Int(70000),
                Value::Float(1.5),
                Value::ident("SWORD"),
            ],
        );
        assert_eq!(data.text(0), "name");
        assert_eq!(data.int::<i16>(1), -1);
        // out of range for the target type -> default
        assert_eq!(data.int::<u16>(2), 0);
        assert_eq!(data.int::<u32>(2), 70000);
        assert_eq!(data.float(3), 1.5);
        assert_eq!(data.enumeration::<DataType>(4), DataType::Sword);
        // missing values
        assert_eq!(data.text(10), "");
        assert_eq!(data.float(10), 0.0);
        assert_eq!(data.enumeration::<DataType>(10), DataType::Ubyte);
    }

    #[test]
    fn child_builders() {
        let mut data = BlockData::new("TEST");
        data.add_flag("DISCRETE", false);
        data.add_flag("READ_ONLY", true);
        data.add_text("FORMAT", Some(&"%6.2".to_string()));
        data.add_int::<u32>("ECU_ADDRESS", None);
        data.add_ident_list(
            "FUNCTION_LIST",
            Some(&vec!["a".to_string(), "b".to_string()]),
        );
        assert_eq!(data.items.len(), 3);

        let Item::Typed(list) = &mut data.items[2] else {
            panic!("expected a typed item");
        };
        assert_eq!(list.text_list(), vec!["a".to_string(), "b".to_string()]);
    }
}

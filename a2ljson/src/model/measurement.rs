use serde::{Deserialize, Serialize};

use super::{ByteOrderEnum, DataType, IfData, IndexMode, RawBlock, impl_object_name, is_false};
use crate::blockdata::{A2lObject, BlockData, Item, Value};

/// A measurement describes a value in the ECU memory which can be read, but not calibrated
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub name: String,
    pub long_identifier: String,
    pub datatype: DataType,
    /// name of the `COMPU_METHOD`; `NO_COMPU_METHOD` for an identical conversion
    pub conversion: String,
    pub resolution: u16,
    pub accuracy: f64,
    pub lower_limit: f64,
    pub upper_limit: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_size: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_mask: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrderEnum>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub discrete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_address: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_address_extension: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_mask: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<IndexMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_dim: Option<MatrixDim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_refresh: Option<MaxRefresh>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_unit: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_write: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_memory_segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_link: Option<SymbolLink>,
    /// the measurements this virtual measurement is calculated from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r#virtual: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// Dimensions of a multidimensional array; unused dimensions are 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixDim {
    pub x_dim: u16,
    pub y_dim: u16,
    pub z_dim: u16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxRefresh {
    pub scaling_unit: u16,
    pub rate: u32,
}

/// Reference to a symbol in the linker map file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolLink {
    pub symbol_name: String,
    pub offset: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// the lines of the `ANNOTATION_TEXT` block
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

impl_object_name!(Measurement);

impl Measurement {
    #[must_use]
    pub fn new(name: &str, datatype: DataType, conversion: &str) -> Self {
        Self {
            name: name.to_string(),
            datatype,
            conversion: conversion.to_string(),
            ..Self::default()
        }
    }
}

impl Default for MatrixDim {
    fn default() -> Self {
        Self {
            x_dim: 1,
            y_dim: 1,
            z_dim: 1,
        }
    }
}

impl A2lObject for Measurement {
    const TAG: &'static str = "MEASUREMENT";

    fn from_data(mut data: BlockData) -> Self {
        let mut measurement = Measurement {
            name: data.text(0),
            long_identifier: data.text(1),
            datatype: data.enumeration(2),
            conversion: data.text(3),
            resolution: data.int(4),
            accuracy: data.float(5),
            lower_limit: data.float(6),
            upper_limit: data.float(7),
            ..Measurement::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => measurement.annotation.push(Annotation::from_data(child)),
                    "ARRAY_SIZE" => measurement.array_size = Some(child.int(0)),
                    "BIT_MASK" => measurement.bit_mask = Some(child.int(0)),
                    "BYTE_ORDER" => measurement.byte_order = Some(child.enumeration(0)),
                    "DISCRETE" => measurement.discrete = true,
                    "DISPLAY_IDENTIFIER" => measurement.display_identifier = Some(child.text(0)),
                    "ECU_ADDRESS" => measurement.ecu_address = Some(child.int(0)),
                    "ECU_ADDRESS_EXTENSION" => {
                        measurement.ecu_address_extension = Some(child.int(0));
                    }
                    "ERROR_MASK" => measurement.error_mask = Some(child.int(0)),
                    "FORMAT" => measurement.format = Some(child.text(0)),
                    "FUNCTION_LIST" => measurement.function_list = Some(child.text_list()),
                    "IF_DATA" => measurement.if_data.push(IfData::from_data(child)),
                    "LAYOUT" => measurement.layout = Some(child.enumeration(0)),
                    "MATRIX_DIM" => measurement.matrix_dim = Some(MatrixDim::from_data(child)),
                    "MAX_REFRESH" => measurement.max_refresh = Some(MaxRefresh::from_data(child)),
                    "PHYS_UNIT" => measurement.phys_unit = Some(child.text(0)),
                    "READ_WRITE" => measurement.read_write = true,
                    "REF_MEMORY_SEGMENT" => measurement.ref_memory_segment = Some(child.text(0)),
                    "SYMBOL_LINK" => measurement.symbol_link = Some(SymbolLink::from_data(child)),
                    "VIRTUAL" => measurement.r#virtual = Some(child.text_list()),
                    _ => {}
                },
                Item::Raw(raw) => measurement.unknown.push(raw),
            }
        }
        measurement
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::enumeration(self.datatype),
                Value::ident(&self.conversion),
                Value::int(self.resolution),
                Value::Float(self.accuracy),
                Value::Float(self.lower_limit),
                Value::Float(self.upper_limit),
            ],
        );
        data.add_objects(&self.annotation);
        data.add_int("ARRAY_SIZE", self.array_size);
        data.add_int("BIT_MASK", self.bit_mask);
        data.add_enum("BYTE_ORDER", self.byte_order);
        data.add_flag("DISCRETE", self.discrete);
        data.add_ident("DISPLAY_IDENTIFIER", self.display_identifier.as_ref());
        data.add_int("ECU_ADDRESS", self.ecu_address);
        data.add_int("ECU_ADDRESS_EXTENSION", self.ecu_address_extension);
        data.add_int("ERROR_MASK", self.error_mask);
        data.add_text("FORMAT", self.format.as_ref());
        data.add_ident_list("FUNCTION_LIST", self.function_list.as_ref());
        data.add_objects(&self.if_data);
        data.add_enum("LAYOUT", self.layout);
        data.add_object(self.matrix_dim.as_ref());
        data.add_object(self.max_refresh.as_ref());
        data.add_text("PHYS_UNIT", self.phys_unit.as_ref());
        data.add_flag("READ_WRITE", self.read_write);
        data.add_ident("REF_MEMORY_SEGMENT", self.ref_memory_segment.as_ref());
        data.add_object(self.symbol_link.as_ref());
        data.add_ident_list("VIRTUAL", self.r#virtual.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for MatrixDim {
    const TAG: &'static str = "MATRIX_DIM";

    fn from_data(data: BlockData) -> Self {
        Self {
            x_dim: data.int(0),
            y_dim: data.int(1),
            z_dim: data.int(2),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![
                Value::int(self.x_dim),
                Value::int(self.y_dim),
                Value::int(self.z_dim),
            ],
        )
    }
}

impl A2lObject for MaxRefresh {
    const TAG: &'static str = "MAX_REFRESH";

    fn from_data(data: BlockData) -> Self {
        Self {
            scaling_unit: data.int(0),
            rate: data.int(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::int(self.scaling_unit), Value::int(self.rate)],
        )
    }
}

impl A2lObject for SymbolLink {
    const TAG: &'static str = "SYMBOL_LINK";

    fn from_data(mut data: BlockData) -> Self {
        Self {
            symbol_name: data.text(0),
            offset: data.int(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::text(&self.symbol_name), Value::int(self.offset)],
        )
    }
}

impl A2lObject for Annotation {
    const TAG: &'static str = "ANNOTATION";

    fn from_data(mut data: BlockData) -> Self {
        let mut annotation = Annotation::default();
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION_LABEL" => annotation.label = Some(child.text(0)),
                    "ANNOTATION_ORIGIN" => annotation.origin = Some(child.text(0)),
                    "ANNOTATION_TEXT" => annotation.text = Some(child.text_list()),
                    _ => {}
                },
                Item::Raw(raw) => annotation.unknown.push(raw),
            }
        }
        annotation
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::new(Self::TAG);
        data.add_text("ANNOTATION_LABEL", self.label.as_ref());
        data.add_text("ANNOTATION_ORIGIN", self.origin.as_ref());
        if let Some(lines) = &self.text {
            let mut text = BlockData::new("ANNOTATION_TEXT");
            text.rows = lines.iter().map(|line| vec![Value::text(line)]).collect();
            data.add_child(text);
        }
        data.add_raw(&self.unknown);
        data
    }
}

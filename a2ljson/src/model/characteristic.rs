use serde::{Deserialize, Serialize};

use super::{
    Annotation, AxisDescrAttribute, ByteOrderEnum, CalibrationAccess, CharacteristicType,
    DepositMode, IfData, MatrixDim, MaxRefresh, MonotonyType, RawBlock, SymbolLink,
    impl_object_name, is_false,
};
use crate::blockdata::{A2lObject, BlockData, Item, Value};

/// A calibratable value, curve or map in the ECU memory
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub name: String,
    pub long_identifier: String,
    pub characteristic_type: CharacteristicType,
    pub address: u32,
    /// name of the `RECORD_LAYOUT`
    pub deposit: String,
    pub max_diff: f64,
    pub conversion: String,
    pub lower_limit: f64,
    pub upper_limit: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub axis_descr: Vec<AxisDescr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_mask: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrderEnum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_access: Option<CalibrationAccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison_quantity: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub discrete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_address_extension: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_limits: Option<ExtendedLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub guard_rails: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_list: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix_dim: Option<MatrixDim>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_refresh: Option<MaxRefresh>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_unit: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_memory_segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_link: Option<SymbolLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// Description of one axis of a curve or map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisDescr {
    pub attribute: AxisDescrAttribute,
    pub input_quantity: String,
    pub conversion: String,
    pub max_axis_points: u16,
    pub lower_limit: f64,
    pub upper_limit: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pts_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrderEnum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub curve_axis_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<DepositMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_limits: Option<ExtendedLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_axis_par: Option<FixAxisPar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_axis_par_dist: Option<FixAxisParDist>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_axis_par_list: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_grad: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotony: Option<MonotonyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_unit: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// An axis that is stored separately from the characteristics that use it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisPts {
    pub name: String,
    pub long_identifier: String,
    pub address: u32,
    pub input_quantity: String,
    pub deposit_record: String,
    pub max_diff: f64,
    pub conversion: String,
    pub max_axis_points: u16,
    pub lower_limit: f64,
    pub upper_limit: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrderEnum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration_access: Option<CalibrationAccess>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<DepositMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_address_extension: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_limits: Option<ExtendedLimits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub guard_rails: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_refresh: Option<MaxRefresh>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monotony: Option<MonotonyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phys_unit: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_memory_segment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol_link: Option<SymbolLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedLimits {
    pub lower_limit: f64,
    pub upper_limit: f64,
}

/// Axis points calculated as offset + i * 2^shift
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAxisPar {
    pub offset: i16,
    pub shift: i16,
    pub number_apo: u16,
}

/// Axis points calculated as offset + i * distance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAxisParDist {
    pub offset: i16,
    pub distance: i16,
    pub number_apo: u16,
}

impl_object_name!(Characteristic, AxisPts);

impl A2lObject for Characteristic {
    const TAG: &'static str = "CHARACTERISTIC";

    fn from_data(mut data: BlockData) -> Self {
        let mut characteristic = Characteristic {
            name: data.text(0),
            long_identifier: data.text(1),
            characteristic_type: data.enumeration(2),
            address: data.int(3),
            deposit: data.text(4),
            max_diff: data.float(5),
            conversion: data.text(6),
            lower_limit: data.float(7),
            upper_limit: data.float(8),
            ..Characteristic::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => characteristic
                        .annotation
                        .push(Annotation::from_data(child)),
                    "AXIS_DESCR" => characteristic.axis_descr.push(AxisDescr::from_data(child)),
                    "BIT_MASK" => characteristic.bit_mask = Some(child.int(0)),
                    "BYTE_ORDER" => characteristic.byte_order = Some(child.enumeration(0)),
                    "CALIBRATION_ACCESS" => {
                        characteristic.calibration_access = Some(child.enumeration(0));
                    }
                    "COMPARISON_QUANTITY" => {
                        characteristic.comparison_quantity = Some(child.text(0));
                    }
                    "DISCRETE" => characteristic.discrete = true,
                    "DISPLAY_IDENTIFIER" => {
                        characteristic.display_identifier = Some(child.text(0));
                    }
                    "ECU_ADDRESS_EXTENSION" => {
                        characteristic.ecu_address_extension = Some(child.int(0));
                    }
                    "EXTENDED_LIMITS" => {
                        characteristic.extended_limits = Some(ExtendedLimits::from_data(child));
                    }
                    "FORMAT" => characteristic.format = Some(child.text(0)),
                    "FUNCTION_LIST" => characteristic.function_list = Some(child.text_list()),
                    "GUARD_RAILS" => characteristic.guard_rails = true,
                    "IF_DATA" => characteristic.if_data.push(IfData::from_data(child)),
                    "MAP_LIST" => characteristic.map_list = Some(child.text_list()),
                    "MATRIX_DIM" => characteristic.matrix_dim = Some(MatrixDim::from_data(child)),
                    "MAX_REFRESH" => {
                        characteristic.max_refresh = Some(MaxRefresh::from_data(child));
                    }
                    "NUMBER" => characteristic.number = Some(child.int(0)),
                    "PHYS_UNIT" => characteristic.phys_unit = Some(child.text(0)),
                    "READ_ONLY" => characteristic.read_only = true,
                    "REF_MEMORY_SEGMENT" => {
                        characteristic.ref_memory_segment = Some(child.text(0));
                    }
                    "STEP_SIZE" => characteristic.step_size = Some(child.float(0)),
                    "SYMBOL_LINK" => {
                        characteristic.symbol_link = Some(SymbolLink::from_data(child));
                    }
                    _ => {}
                },
                Item::Raw(raw) => characteristic.unknown.push(raw),
            }
        }
        characteristic
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::enumeration(self.characteristic_type),
                Value::int(self.address),
                Value::ident(&self.deposit),
                Value::Float(self.max_diff),
                Value::ident(&self.conversion),
                Value::Float(self.lower_limit),
                Value::Float(self.upper_limit),
            ],
        );
        data.add_objects(&self.annotation);
        data.add_objects(&self.axis_descr);
        data.add_int("BIT_MASK", self.bit_mask);
        data.add_enum("BYTE_ORDER", self.byte_order);
        data.add_enum("CALIBRATION_ACCESS", self.calibration_access);
        data.add_ident("COMPARISON_QUANTITY", self.comparison_quantity.as_ref());
        data.add_flag("DISCRETE", self.discrete);
        data.add_ident("DISPLAY_IDENTIFIER", self.display_identifier.as_ref());
        data.add_int("ECU_ADDRESS_EXTENSION", self.ecu_address_extension);
        data.add_object(self.extended_limits.as_ref());
        data.add_text("FORMAT", self.format.as_ref());
        data.add_ident_list("FUNCTION_LIST", self.function_list.as_ref());
        data.add_flag("GUARD_RAILS", self.guard_rails);
        data.add_objects(&self.if_data);
        data.add_ident_list("MAP_LIST", self.map_list.as_ref());
        data.add_object(self.matrix_dim.as_ref());
        data.add_object(self.max_refresh.as_ref());
        data.add_int("NUMBER", self.number);
        data.add_text("PHYS_UNIT", self.phys_unit.as_ref());
        data.add_flag("READ_ONLY", self.read_only);
        data.add_ident("REF_MEMORY_SEGMENT", self.ref_memory_segment.as_ref());
        data.add_float("STEP_SIZE", self.step_size);
        data.add_object(self.symbol_link.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for AxisDescr {
    const TAG: &'static str = "AXIS_DESCR";

    fn from_data(mut data: BlockData) -> Self {
        let mut axis_descr = AxisDescr {
            attribute: data.enumeration(0),
            input_quantity: data.text(1),
            conversion: data.text(2),
            max_axis_points: data.int(3),
            lower_limit: data.float(4),
            upper_limit: data.float(5),
            ..AxisDescr::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => axis_descr.annotation.push(Annotation::from_data(child)),
                    "AXIS_PTS_REF" => axis_descr.axis_pts_ref = Some(child.text(0)),
                    "BYTE_ORDER" => axis_descr.byte_order = Some(child.enumeration(0)),
                    "CURVE_AXIS_REF" => axis_descr.curve_axis_ref = Some(child.text(0)),
                    "DEPOSIT" => axis_descr.deposit = Some(child.enumeration(0)),
                    "EXTENDED_LIMITS" => {
                        axis_descr.extended_limits = Some(ExtendedLimits::from_data(child));
                    }
                    "FIX_AXIS_PAR" => axis_descr.fix_axis_par = Some(FixAxisPar::from_data(child)),
                    "FIX_AXIS_PAR_DIST" => {
                        axis_descr.fix_axis_par_dist = Some(FixAxisParDist::from_data(child));
                    }
                    "FIX_AXIS_PAR_LIST" => axis_descr.fix_axis_par_list = Some(child.float_list()),
                    "FORMAT" => axis_descr.format = Some(child.text(0)),
                    "MAX_GRAD" => axis_descr.max_grad = Some(child.float(0)),
                    "MONOTONY" => axis_descr.monotony = Some(child.enumeration(0)),
                    "PHYS_UNIT" => axis_descr.phys_unit = Some(child.text(0)),
                    "READ_ONLY" => axis_descr.read_only = true,
                    "STEP_SIZE" => axis_descr.step_size = Some(child.float(0)),
                    _ => {}
                },
                Item::Raw(raw) => axis_descr.unknown.push(raw),
            }
        }
        axis_descr
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::enumeration(self.attribute),
                Value::ident(&self.input_quantity),
                Value::ident(&self.conversion),
                Value::int(self.max_axis_points),
                Value::Float(self.lower_limit),
                Value::Float(self.upper_limit),
            ],
        );
        data.add_objects(&self.annotation);
        data.add_ident("AXIS_PTS_REF", self.axis_pts_ref.as_ref());
        data.add_enum("BYTE_ORDER", self.byte_order);
        data.add_ident("CURVE_AXIS_REF", self.curve_axis_ref.as_ref());
        data.add_enum("DEPOSIT", self.deposit);
        data.add_object(self.extended_limits.as_ref());
        data.add_object(self.fix_axis_par.as_ref());
        data.add_object(self.fix_axis_par_dist.as_ref());
        data.add_float_list("FIX_AXIS_PAR_LIST", self.fix_axis_par_list.as_ref());
        data.add_text("FORMAT", self.format.as_ref());
        data.add_float("MAX_GRAD", self.max_grad);
        data.add_enum("MONOTONY", self.monotony);
        data.add_text("PHYS_UNIT", self.phys_unit.as_ref());
        data.add_flag("READ_ONLY", self.read_only);
        data.add_float("STEP_SIZE", self.step_size);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for AxisPts {
    const TAG: &'static str = "AXIS_PTS";

    fn from_data(mut data: BlockData) -> Self {
        let mut axis_pts = AxisPts {
            name: data.text(0),
            long_identifier: data.text(1),
            address: data.int(2),
            input_quantity: data.text(3),
            deposit_record: data.text(4),
            max_diff: data.float(5),
            conversion: data.text(6),
            max_axis_points: data.int(7),
            lower_limit: data.float(8),
            upper_limit: data.float(9),
            ..AxisPts::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => axis_pts.annotation.push(Annotation::from_data(child)),
                    "BYTE_ORDER" => axis_pts.byte_order = Some(child.enumeration(0)),
                    "CALIBRATION_ACCESS" => axis_pts.calibration_access = Some(child.enumeration(0)),
                    "DEPOSIT" => axis_pts.deposit = Some(child.enumeration(0)),
                    "DISPLAY_IDENTIFIER" => axis_pts.display_identifier = Some(child.text(0)),
                    "ECU_ADDRESS_EXTENSION" => axis_pts.ecu_address_extension = Some(child.int(0)),
                    "EXTENDED_LIMITS" => {
                        axis_pts.extended_limits = Some(ExtendedLimits::from_data(child));
                    }
                    "FORMAT" => axis_pts.format = Some(child.text(0)),
                    "FUNCTION_LIST" => axis_pts.function_list = Some(child.text_list()),
                    "GUARD_RAILS" => axis_pts.guard_rails = true,
                    "IF_DATA" => axis_pts.if_data.push(IfData::from_data(child)),
                    "MAX_REFRESH" => axis_pts.max_refresh = Some(MaxRefresh::from_data(child)),
                    "MONOTONY" => axis_pts.monotony = Some(child.enumeration(0)),
                    "PHYS_UNIT" => axis_pts.phys_unit = Some(child.text(0)),
                    "READ_ONLY" => axis_pts.read_only = true,
                    "REF_MEMORY_SEGMENT" => axis_pts.ref_memory_segment = Some(child.text(0)),
                    "STEP_SIZE" => axis_pts.step_size = Some(child.float(0)),
                    "SYMBOL_LINK" => axis_pts.symbol_link = Some(SymbolLink::from_data(child)),
                    _ => {}
                },
                Item::Raw(raw) => axis_pts.unknown.push(raw),
            }
        }
        axis_pts
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::int(self.address),
                Value::ident(&self.input_quantity),
                Value::ident(&self.deposit_record),
                Value::Float(self.max_diff),
                Value::ident(&self.conversion),
                Value::int(self.max_axis_points),
                Value::Float(self.lower_limit),
                Value::Float(self.upper_limit),
            ],
        );
        data.add_objects(&self.annotation);
        data.add_enum("BYTE_ORDER", self.byte_order);
        data.add_enum("CALIBRATION_ACCESS", self.calibration_access);
        data.add_enum("DEPOSIT", self.deposit);
        data.add_ident("DISPLAY_IDENTIFIER", self.display_identifier.as_ref());
        data.add_int("ECU_ADDRESS_EXTENSION", self.ecu_address_extension);
        data.add_object(self.extended_limits.as_ref());
        data.add_text("FORMAT", self.format.as_ref());
        data.add_ident_list("FUNCTION_LIST", self.function_list.as_ref());
        data.add_flag("GUARD_RAILS", self.guard_rails);
        data.add_objects(&self.if_data);
        data.add_object(self.max_refresh.as_ref());
        data.add_enum("MONOTONY", self.monotony);
        data.add_text("PHYS_UNIT", self.phys_unit.as_ref());
        data.add_flag("READ_ONLY", self.read_only);
        data.add_ident("REF_MEMORY_SEGMENT", self.ref_memory_segment.as_ref());
        data.add_float("STEP_SIZE", self.step_size);
        data.add_object(self.symbol_link.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for ExtendedLimits {
    const TAG: &'static str = "EXTENDED_LIMITS";

    fn from_data(data: BlockData) -> Self {
        Self {
            lower_limit: data.float(0),
            upper_limit: data.float(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::Float(self.lower_limit), Value::Float(self.upper_limit)],
        )
    }
}

impl A2lObject for FixAxisPar {
    const TAG: &'static str = "FIX_AXIS_PAR";

    fn from_data(data: BlockData) -> Self {
        Self {
            offset: data.int(0),
            shift: data.int(1),
            number_apo: data.int(2),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![
                Value::int(self.offset),
                Value::int(self.shift),
                Value::int(self.number_apo),
            ],
        )
    }
}

impl A2lObject for FixAxisParDist {
    const TAG: &'static str = "FIX_AXIS_PAR_DIST";

    fn from_data(data: BlockData) -> Self {
        Self {
            offset: data.int(0),
            distance: data.int(1),
            number_apo: data.int(2),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![
                Value::int(self.offset),
                Value::int(self.distance),
                Value::int(self.number_apo),
            ],
        )
    }
}

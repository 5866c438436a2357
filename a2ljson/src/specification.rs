use fnv::FnvBuildHasher;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::model::{
    AddrType, AxisDescrAttribute, ByteOrderEnum, CalibrationAccess, CharacteristicType,
    ConversionType, DataType, DataTypeSize, DepositMode, IndexMode, IndexOrder, MemoryAttribute,
    MemoryType, MonotonyType, PrgType, UnitType,
};

/// name of the implicit block that wraps the whole file
pub(crate) const FILE_TAG: &str = "A2L_FILE";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntType {
    Uint,
    Int,
    Ulong,
    Long,
    Uint64,
    Int64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParamKind {
    Ident,
    String,
    Int(IntType),
    /// an integer that is always written in hex notation
    Hex(IntType),
    Float,
    Enum(&'static [&'static str]),
    /// the text of an A2ML block
    Verbatim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Multiplicity {
    One,
    ZeroOrOne,
    Any,
    /// at least one
    Many,
}

#[derive(Debug)]
pub(crate) struct ParamSpec {
    pub(crate) name: &'static str,
    pub(crate) kind: ParamKind,
    // value substituted when the parameter is missing or invalid
    pub(crate) default: Option<i128>,
}

#[derive(Debug)]
pub(crate) struct ChildSpec {
    pub(crate) tag: &'static str,
    pub(crate) multiplicity: Multiplicity,
}

#[derive(Debug)]
pub(crate) struct BlockSpec {
    pub(crate) tag: &'static str,
    pub(crate) is_block: bool,
    pub(crate) params: &'static [ParamSpec],
    // repeated group of parameters following the positional ones
    pub(crate) tail: &'static [ParamSpec],
    // index of the positional parameter that declares the number of tail rows
    pub(crate) count: Option<usize>,
    pub(crate) children: &'static [ChildSpec],
    // content is kept as raw values and blocks, without any checks
    pub(crate) opaque: bool,
}

impl BlockSpec {
    /// Is `tag` a permitted child of this block?
    pub(crate) fn permits(&self, tag: &str) -> bool {
        self.child(tag).is_some()
    }

    pub(crate) fn child(&self, tag: &str) -> Option<&'static ChildSpec> {
        self.children.iter().find(|child| child.tag == tag)
    }

    /// position of a child keyword in the canonical output order
    pub(crate) fn child_position(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|child| child.tag == tag)
    }

    /// Items in a sequence of this block are identified by their first parameter
    pub(crate) fn is_named(&self) -> bool {
        !self.opaque
            && self
                .params
                .first()
                .is_some_and(|param| param.kind == ParamKind::Ident)
    }
}

/// look up the schema of a keyword
pub(crate) fn lookup(tag: &str) -> Option<&'static BlockSpec> {
    static MAP: OnceLock<HashMap<&'static str, &'static BlockSpec, FnvBuildHasher>> =
        OnceLock::new();
    MAP.get_or_init(|| {
        SPECIFICATION
            .iter()
            .map(|spec| (spec.tag, spec))
            .collect()
    })
    .get(tag)
    .copied()
}

// ------------------------------------------------------------------------------------------------
// helpers for writing the table

macro_rules! p {
    ($name:literal, $kind:expr $(,)?) => {
        ParamSpec {
            name: $name,
            kind: $kind,
            default: None,
        }
    };
    ($name:literal, $kind:expr, default $value:literal $(,)?) => {
        ParamSpec {
            name: $name,
            kind: $kind,
            default: Some($value),
        }
    };
}

macro_rules! one {
    ($tag:expr) => {
        ChildSpec {
            tag: $tag,
            multiplicity: Multiplicity::One,
        }
    };
}

macro_rules! zero_or_one {
    ($tag:expr) => {
        ChildSpec {
            tag: $tag,
            multiplicity: Multiplicity::ZeroOrOne,
        }
    };
}

macro_rules! any {
    ($tag:expr) => {
        ChildSpec {
            tag: $tag,
            multiplicity: Multiplicity::Any,
        }
    };
}

macro_rules! many {
    ($tag:expr) => {
        ChildSpec {
            tag: $tag,
            multiplicity: Multiplicity::Many,
        }
    };
}

const fn keyword(tag: &'static str, params: &'static [ParamSpec]) -> BlockSpec {
    BlockSpec {
        tag,
        is_block: false,
        params,
        tail: &[],
        count: None,
        children: &[],
        opaque: false,
    }
}

const fn block(
    tag: &'static str,
    params: &'static [ParamSpec],
    children: &'static [ChildSpec],
) -> BlockSpec {
    BlockSpec {
        tag,
        is_block: true,
        params,
        tail: &[],
        count: None,
        children,
        opaque: false,
    }
}

const fn table(
    tag: &'static str,
    params: &'static [ParamSpec],
    count: usize,
    tail: &'static [ParamSpec],
    children: &'static [ChildSpec],
) -> BlockSpec {
    BlockSpec {
        tag,
        is_block: true,
        params,
        tail,
        count: Some(count),
        children,
        opaque: false,
    }
}

const fn list(tag: &'static str, element: &'static [ParamSpec]) -> BlockSpec {
    BlockSpec {
        tag,
        is_block: true,
        params: &[],
        tail: element,
        count: None,
        children: &[],
        opaque: false,
    }
}

const IDENT: ParamKind = ParamKind::Ident;
const STRING: ParamKind = ParamKind::String;
const FLOAT: ParamKind = ParamKind::Float;
const UINT: ParamKind = ParamKind::Int(IntType::Uint);
const INT: ParamKind = ParamKind::Int(IntType::Int);
const ULONG: ParamKind = ParamKind::Int(IntType::Ulong);
const LONG: ParamKind = ParamKind::Int(IntType::Long);
const HEX_ULONG: ParamKind = ParamKind::Hex(IntType::Ulong);

const IDENTIFIER_LIST: &[ParamSpec] = &[p!("identifier", IDENT)];
const ALIGNMENT: &[ParamSpec] = &[p!("alignment_border", UINT)];
const POSITION_DATATYPE: &[ParamSpec] = &[
    p!("position", UINT),
    p!("datatype", ParamKind::Enum(DataType::TAGS)),
];
const AXIS_PTS_LAYOUT: &[ParamSpec] = &[
    p!("position", UINT),
    p!("datatype", ParamKind::Enum(DataType::TAGS)),
    p!("index_incr", ParamKind::Enum(IndexOrder::TAGS)),
    p!("addressing", ParamKind::Enum(AddrType::TAGS)),
];

/// The closed keyword table. Every keyword the builder recognizes is listed here exactly once.
pub(crate) static SPECIFICATION: &[BlockSpec] = &[
    block(
        FILE_TAG,
        &[],
        &[
            zero_or_one!("ASAP2_VERSION"),
            zero_or_one!("A2ML_VERSION"),
            one!("PROJECT"),
        ],
    ),
    keyword(
        "ASAP2_VERSION",
        &[p!("version_no", UINT), p!("upgrade_no", UINT)],
    ),
    keyword(
        "A2ML_VERSION",
        &[p!("version_no", UINT), p!("upgrade_no", UINT)],
    ),
    block(
        "PROJECT",
        &[p!("name", IDENT), p!("long_identifier", STRING)],
        &[zero_or_one!("HEADER"), many!("MODULE")],
    ),
    block(
        "HEADER",
        &[p!("comment", STRING)],
        &[zero_or_one!("VERSION"), zero_or_one!("PROJECT_NO")],
    ),
    keyword("VERSION", &[p!("version_identifier", STRING)]),
    keyword("PROJECT_NO", &[p!("project_number", IDENT)]),
    block(
        "MODULE",
        &[p!("name", IDENT), p!("long_identifier", STRING)],
        &[
            zero_or_one!("A2ML"),
            zero_or_one!("MOD_PAR"),
            zero_or_one!("MOD_COMMON"),
            any!("IF_DATA"),
            any!("CHARACTERISTIC"),
            any!("AXIS_PTS"),
            any!("MEASUREMENT"),
            any!("COMPU_METHOD"),
            any!("COMPU_TAB"),
            any!("COMPU_VTAB"),
            any!("COMPU_VTAB_RANGE"),
            any!("FUNCTION"),
            any!("GROUP"),
            any!("RECORD_LAYOUT"),
            any!("UNIT"),
        ],
    ),
    block("A2ML", &[p!("text", ParamKind::Verbatim)], &[]),
    BlockSpec {
        tag: "IF_DATA",
        is_block: true,
        params: &[p!("name", IDENT)],
        tail: &[],
        count: None,
        children: &[],
        opaque: true,
    },
    // MOD_PAR and its content
    block(
        "MOD_PAR",
        &[p!("comment", STRING)],
        &[
            zero_or_one!("VERSION"),
            any!("ADDR_EPK"),
            zero_or_one!("EPK"),
            zero_or_one!("SUPPLIER"),
            zero_or_one!("CUSTOMER"),
            zero_or_one!("CUSTOMER_NO"),
            zero_or_one!("USER"),
            zero_or_one!("PHONE_NO"),
            zero_or_one!("ECU"),
            zero_or_one!("CPU_TYPE"),
            zero_or_one!("NO_OF_INTERFACES"),
            zero_or_one!("ECU_CALIBRATION_OFFSET"),
            any!("MEMORY_SEGMENT"),
            any!("SYSTEM_CONSTANT"),
        ],
    ),
    keyword("ADDR_EPK", &[p!("address", HEX_ULONG)]),
    keyword("EPK", &[p!("identifier", STRING)]),
    keyword("SUPPLIER", &[p!("manufacturer", STRING)]),
    keyword("CUSTOMER", &[p!("customer", STRING)]),
    keyword("CUSTOMER_NO", &[p!("number", STRING)]),
    keyword("USER", &[p!("user_name", STRING)]),
    keyword("PHONE_NO", &[p!("telnum", STRING)]),
    keyword("ECU", &[p!("control_unit", STRING)]),
    keyword("CPU_TYPE", &[p!("cpu", STRING)]),
    keyword("NO_OF_INTERFACES", &[p!("num", UINT)]),
    keyword("ECU_CALIBRATION_OFFSET", &[p!("offset", LONG)]),
    block(
        "MEMORY_SEGMENT",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("prg_type", ParamKind::Enum(PrgType::TAGS)),
            p!("memory_type", ParamKind::Enum(MemoryType::TAGS)),
            p!("attribute", ParamKind::Enum(MemoryAttribute::TAGS)),
            p!("address", HEX_ULONG),
            p!("size", HEX_ULONG),
            p!("offset_1", LONG),
            p!("offset_2", LONG),
            p!("offset_3", LONG),
            p!("offset_4", LONG),
            p!("offset_5", LONG),
        ],
        &[any!("IF_DATA")],
    ),
    keyword(
        "SYSTEM_CONSTANT",
        &[p!("name", STRING), p!("value", STRING)],
    ),
    // MOD_COMMON and its content
    block(
        "MOD_COMMON",
        &[p!("comment", STRING)],
        &[
            zero_or_one!("S_REC_LAYOUT"),
            zero_or_one!("DEPOSIT"),
            zero_or_one!("BYTE_ORDER"),
            zero_or_one!("DATA_SIZE"),
            zero_or_one!("ALIGNMENT_BYTE"),
            zero_or_one!("ALIGNMENT_WORD"),
            zero_or_one!("ALIGNMENT_LONG"),
            zero_or_one!("ALIGNMENT_INT64"),
            zero_or_one!("ALIGNMENT_FLOAT16_IEEE"),
            zero_or_one!("ALIGNMENT_FLOAT32_IEEE"),
            zero_or_one!("ALIGNMENT_FLOAT64_IEEE"),
        ],
    ),
    keyword("S_REC_LAYOUT", &[p!("name", IDENT)]),
    keyword(
        "DEPOSIT",
        &[p!("mode", ParamKind::Enum(DepositMode::TAGS))],
    ),
    keyword(
        "BYTE_ORDER",
        &[p!("byte_order", ParamKind::Enum(ByteOrderEnum::TAGS))],
    ),
    keyword("DATA_SIZE", &[p!("size", UINT)]),
    keyword("ALIGNMENT_BYTE", ALIGNMENT),
    keyword("ALIGNMENT_WORD", ALIGNMENT),
    keyword("ALIGNMENT_LONG", ALIGNMENT),
    keyword("ALIGNMENT_INT64", ALIGNMENT),
    keyword("ALIGNMENT_FLOAT16_IEEE", ALIGNMENT),
    keyword("ALIGNMENT_FLOAT32_IEEE", ALIGNMENT),
    keyword("ALIGNMENT_FLOAT64_IEEE", ALIGNMENT),
    // MEASUREMENT
    block(
        "MEASUREMENT",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("datatype", ParamKind::Enum(DataType::TAGS)),
            p!("conversion", IDENT),
            p!("resolution", UINT),
            p!("accuracy", FLOAT),
            p!("lower_limit", FLOAT),
            p!("upper_limit", FLOAT),
        ],
        &[
            any!("ANNOTATION"),
            zero_or_one!("ARRAY_SIZE"),
            zero_or_one!("BIT_MASK"),
            zero_or_one!("BYTE_ORDER"),
            zero_or_one!("DISCRETE"),
            zero_or_one!("DISPLAY_IDENTIFIER"),
            zero_or_one!("ECU_ADDRESS"),
            zero_or_one!("ECU_ADDRESS_EXTENSION"),
            zero_or_one!("ERROR_MASK"),
            zero_or_one!("FORMAT"),
            zero_or_one!("FUNCTION_LIST"),
            any!("IF_DATA"),
            zero_or_one!("LAYOUT"),
            zero_or_one!("MATRIX_DIM"),
            zero_or_one!("MAX_REFRESH"),
            zero_or_one!("PHYS_UNIT"),
            zero_or_one!("READ_WRITE"),
            zero_or_one!("REF_MEMORY_SEGMENT"),
            zero_or_one!("SYMBOL_LINK"),
            zero_or_one!("VIRTUAL"),
        ],
    ),
    block(
        "ANNOTATION",
        &[],
        &[
            zero_or_one!("ANNOTATION_LABEL"),
            zero_or_one!("ANNOTATION_ORIGIN"),
            zero_or_one!("ANNOTATION_TEXT"),
        ],
    ),
    keyword("ANNOTATION_LABEL", &[p!("label", STRING)]),
    keyword("ANNOTATION_ORIGIN", &[p!("origin", STRING)]),
    list("ANNOTATION_TEXT", &[p!("annotation_text", STRING)]),
    keyword("ARRAY_SIZE", &[p!("number", UINT)]),
    keyword("BIT_MASK", &[p!("mask", HEX_ULONG)]),
    keyword("DISCRETE", &[]),
    keyword("DISPLAY_IDENTIFIER", &[p!("display_name", IDENT)]),
    keyword("ECU_ADDRESS", &[p!("address", HEX_ULONG)]),
    keyword("ECU_ADDRESS_EXTENSION", &[p!("extension", INT)]),
    keyword("ERROR_MASK", &[p!("mask", HEX_ULONG)]),
    keyword("FORMAT", &[p!("format_string", STRING)]),
    list("FUNCTION_LIST", &[p!("name", IDENT)]),
    keyword(
        "LAYOUT",
        &[p!("index_mode", ParamKind::Enum(IndexMode::TAGS))],
    ),
    keyword(
        "MATRIX_DIM",
        &[
            p!("x_dim", UINT, default 1),
            p!("y_dim", UINT, default 1),
            p!("z_dim", UINT, default 1),
        ],
    ),
    keyword(
        "MAX_REFRESH",
        &[p!("scaling_unit", UINT), p!("rate", ULONG)],
    ),
    keyword("PHYS_UNIT", &[p!("unit", STRING)]),
    keyword("READ_WRITE", &[]),
    keyword("REF_MEMORY_SEGMENT", &[p!("name", IDENT)]),
    keyword(
        "SYMBOL_LINK",
        &[p!("symbol_name", STRING), p!("offset", LONG)],
    ),
    list("VIRTUAL", &[p!("measuring_channel", IDENT)]),
    // CHARACTERISTIC and AXIS_PTS
    block(
        "CHARACTERISTIC",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!(
                "characteristic_type",
                ParamKind::Enum(CharacteristicType::TAGS),
            ),
            p!("address", HEX_ULONG),
            p!("deposit", IDENT),
            p!("max_diff", FLOAT),
            p!("conversion", IDENT),
            p!("lower_limit", FLOAT),
            p!("upper_limit", FLOAT),
        ],
        &[
            any!("ANNOTATION"),
            any!("AXIS_DESCR"),
            zero_or_one!("BIT_MASK"),
            zero_or_one!("BYTE_ORDER"),
            zero_or_one!("CALIBRATION_ACCESS"),
            zero_or_one!("COMPARISON_QUANTITY"),
            zero_or_one!("DISCRETE"),
            zero_or_one!("DISPLAY_IDENTIFIER"),
            zero_or_one!("ECU_ADDRESS_EXTENSION"),
            zero_or_one!("EXTENDED_LIMITS"),
            zero_or_one!("FORMAT"),
            zero_or_one!("FUNCTION_LIST"),
            zero_or_one!("GUARD_RAILS"),
            any!("IF_DATA"),
            zero_or_one!("MAP_LIST"),
            zero_or_one!("MATRIX_DIM"),
            zero_or_one!("MAX_REFRESH"),
            zero_or_one!("NUMBER"),
            zero_or_one!("PHYS_UNIT"),
            zero_or_one!("READ_ONLY"),
            zero_or_one!("REF_MEMORY_SEGMENT"),
            zero_or_one!("STEP_SIZE"),
            zero_or_one!("SYMBOL_LINK"),
        ],
    ),
    keyword(
        "CALIBRATION_ACCESS",
        &[p!(
            "calibration_access",
            ParamKind::Enum(CalibrationAccess::TAGS),
        )],
    ),
    keyword("COMPARISON_QUANTITY", &[p!("name", IDENT)]),
    keyword(
        "EXTENDED_LIMITS",
        &[p!("lower_limit", FLOAT), p!("upper_limit", FLOAT)],
    ),
    keyword("GUARD_RAILS", &[]),
    list("MAP_LIST", &[p!("name", IDENT)]),
    keyword("NUMBER", &[p!("number", UINT)]),
    keyword("READ_ONLY", &[]),
    keyword("STEP_SIZE", &[p!("step_size", FLOAT)]),
    block(
        "AXIS_DESCR",
        &[
            p!("attribute", ParamKind::Enum(AxisDescrAttribute::TAGS)),
            p!("input_quantity", IDENT),
            p!("conversion", IDENT),
            p!("max_axis_points", UINT),
            p!("lower_limit", FLOAT),
            p!("upper_limit", FLOAT),
        ],
        &[
            any!("ANNOTATION"),
            zero_or_one!("AXIS_PTS_REF"),
            zero_or_one!("BYTE_ORDER"),
            zero_or_one!("CURVE_AXIS_REF"),
            zero_or_one!("DEPOSIT"),
            zero_or_one!("EXTENDED_LIMITS"),
            zero_or_one!("FIX_AXIS_PAR"),
            zero_or_one!("FIX_AXIS_PAR_DIST"),
            zero_or_one!("FIX_AXIS_PAR_LIST"),
            zero_or_one!("FORMAT"),
            zero_or_one!("MAX_GRAD"),
            zero_or_one!("MONOTONY"),
            zero_or_one!("PHYS_UNIT"),
            zero_or_one!("READ_ONLY"),
            zero_or_one!("STEP_SIZE"),
        ],
    ),
    keyword("AXIS_PTS_REF", &[p!("axis_points", IDENT)]),
    keyword("CURVE_AXIS_REF", &[p!("curve_axis", IDENT)]),
    keyword(
        "FIX_AXIS_PAR",
        &[p!("offset", INT), p!("shift", INT), p!("number_apo", UINT)],
    ),
    keyword(
        "FIX_AXIS_PAR_DIST",
        &[p!("offset", INT), p!("distance", INT), p!("number_apo", UINT)],
    ),
    list("FIX_AXIS_PAR_LIST", &[p!("axis_pts_value", FLOAT)]),
    keyword("MAX_GRAD", &[p!("max_gradient", FLOAT)]),
    keyword(
        "MONOTONY",
        &[p!("monotony", ParamKind::Enum(MonotonyType::TAGS))],
    ),
    block(
        "AXIS_PTS",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("address", HEX_ULONG),
            p!("input_quantity", IDENT),
            p!("deposit_record", IDENT),
            p!("max_diff", FLOAT),
            p!("conversion", IDENT),
            p!("max_axis_points", UINT),
            p!("lower_limit", FLOAT),
            p!("upper_limit", FLOAT),
        ],
        &[
            any!("ANNOTATION"),
            zero_or_one!("BYTE_ORDER"),
            zero_or_one!("CALIBRATION_ACCESS"),
            zero_or_one!("DEPOSIT"),
            zero_or_one!("DISPLAY_IDENTIFIER"),
            zero_or_one!("ECU_ADDRESS_EXTENSION"),
            zero_or_one!("EXTENDED_LIMITS"),
            zero_or_one!("FORMAT"),
            zero_or_one!("FUNCTION_LIST"),
            zero_or_one!("GUARD_RAILS"),
            any!("IF_DATA"),
            zero_or_one!("MAX_REFRESH"),
            zero_or_one!("MONOTONY"),
            zero_or_one!("PHYS_UNIT"),
            zero_or_one!("READ_ONLY"),
            zero_or_one!("REF_MEMORY_SEGMENT"),
            zero_or_one!("STEP_SIZE"),
            zero_or_one!("SYMBOL_LINK"),
        ],
    ),
    // conversions
    block(
        "COMPU_METHOD",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("conversion_type", ParamKind::Enum(ConversionType::TAGS)),
            p!("format", STRING),
            p!("unit", STRING),
        ],
        &[
            zero_or_one!("COEFFS"),
            zero_or_one!("COEFFS_LINEAR"),
            zero_or_one!("COMPU_TAB_REF"),
            zero_or_one!("FORMULA"),
            zero_or_one!("REF_UNIT"),
            zero_or_one!("STATUS_STRING_REF"),
        ],
    ),
    keyword(
        "COEFFS",
        &[
            p!("a", FLOAT),
            p!("b", FLOAT),
            p!("c", FLOAT),
            p!("d", FLOAT),
            p!("e", FLOAT),
            p!("f", FLOAT),
        ],
    ),
    keyword("COEFFS_LINEAR", &[p!("a", FLOAT), p!("b", FLOAT)]),
    keyword("COMPU_TAB_REF", &[p!("conversion_table", IDENT)]),
    block(
        "FORMULA",
        &[p!("fx", STRING)],
        &[zero_or_one!("FORMULA_INV")],
    ),
    keyword("FORMULA_INV", &[p!("gx", STRING)]),
    keyword("REF_UNIT", &[p!("unit", IDENT)]),
    keyword("STATUS_STRING_REF", &[p!("conversion_table", IDENT)]),
    table(
        "COMPU_TAB",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("conversion_type", ParamKind::Enum(ConversionType::TAGS)),
            p!("number_value_pairs", UINT),
        ],
        3,
        &[p!("in_val", FLOAT), p!("out_val", FLOAT)],
        &[
            zero_or_one!("DEFAULT_VALUE"),
            zero_or_one!("DEFAULT_VALUE_NUMERIC"),
        ],
    ),
    keyword("DEFAULT_VALUE", &[p!("display_string", STRING)]),
    keyword("DEFAULT_VALUE_NUMERIC", &[p!("display_value", FLOAT)]),
    table(
        "COMPU_VTAB",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("conversion_type", ParamKind::Enum(ConversionType::TAGS)),
            p!("number_value_pairs", UINT),
        ],
        3,
        &[p!("in_val", FLOAT), p!("out_val", STRING)],
        &[zero_or_one!("DEFAULT_VALUE")],
    ),
    table(
        "COMPU_VTAB_RANGE",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("number_value_triples", UINT),
        ],
        2,
        &[
            p!("in_val_min", FLOAT),
            p!("in_val_max", FLOAT),
            p!("out_val", STRING),
        ],
        &[zero_or_one!("DEFAULT_VALUE")],
    ),
    // FUNCTION and GROUP
    block(
        "FUNCTION",
        &[p!("name", IDENT), p!("long_identifier", STRING)],
        &[
            any!("ANNOTATION"),
            zero_or_one!("DEF_CHARACTERISTIC"),
            zero_or_one!("FUNCTION_VERSION"),
            any!("IF_DATA"),
            zero_or_one!("IN_MEASUREMENT"),
            zero_or_one!("LOC_MEASUREMENT"),
            zero_or_one!("OUT_MEASUREMENT"),
            zero_or_one!("REF_CHARACTERISTIC"),
            zero_or_one!("SUB_FUNCTION"),
        ],
    ),
    keyword("FUNCTION_VERSION", &[p!("version_identifier", STRING)]),
    block(
        "GROUP",
        &[
            p!("group_name", IDENT),
            p!("group_long_identifier", STRING),
        ],
        &[
            any!("ANNOTATION"),
            zero_or_one!("FUNCTION_LIST"),
            any!("IF_DATA"),
            zero_or_one!("REF_CHARACTERISTIC"),
            zero_or_one!("REF_MEASUREMENT"),
            zero_or_one!("ROOT"),
            zero_or_one!("SUB_GROUP"),
        ],
    ),
    keyword("ROOT", &[]),
    list("DEF_CHARACTERISTIC", IDENTIFIER_LIST),
    list("REF_CHARACTERISTIC", IDENTIFIER_LIST),
    list("REF_MEASUREMENT", IDENTIFIER_LIST),
    list("IN_MEASUREMENT", IDENTIFIER_LIST),
    list("OUT_MEASUREMENT", IDENTIFIER_LIST),
    list("LOC_MEASUREMENT", IDENTIFIER_LIST),
    list("SUB_FUNCTION", IDENTIFIER_LIST),
    list("SUB_GROUP", IDENTIFIER_LIST),
    // RECORD_LAYOUT
    block(
        "RECORD_LAYOUT",
        &[p!("name", IDENT)],
        &[
            zero_or_one!("FNC_VALUES"),
            zero_or_one!("IDENTIFICATION"),
            zero_or_one!("AXIS_PTS_X"),
            zero_or_one!("AXIS_PTS_Y"),
            zero_or_one!("AXIS_PTS_Z"),
            zero_or_one!("NO_AXIS_PTS_X"),
            zero_or_one!("NO_AXIS_PTS_Y"),
            zero_or_one!("NO_AXIS_PTS_Z"),
            any!("RESERVED"),
            zero_or_one!("ALIGNMENT_BYTE"),
            zero_or_one!("ALIGNMENT_WORD"),
            zero_or_one!("ALIGNMENT_LONG"),
            zero_or_one!("ALIGNMENT_INT64"),
            zero_or_one!("ALIGNMENT_FLOAT16_IEEE"),
            zero_or_one!("ALIGNMENT_FLOAT32_IEEE"),
            zero_or_one!("ALIGNMENT_FLOAT64_IEEE"),
            zero_or_one!("STATIC_RECORD_LAYOUT"),
        ],
    ),
    keyword(
        "FNC_VALUES",
        &[
            p!("position", UINT),
            p!("datatype", ParamKind::Enum(DataType::TAGS)),
            p!("index_mode", ParamKind::Enum(IndexMode::TAGS)),
            p!("address_type", ParamKind::Enum(AddrType::TAGS)),
        ],
    ),
    keyword("IDENTIFICATION", POSITION_DATATYPE),
    keyword("AXIS_PTS_X", AXIS_PTS_LAYOUT),
    keyword("AXIS_PTS_Y", AXIS_PTS_LAYOUT),
    keyword("AXIS_PTS_Z", AXIS_PTS_LAYOUT),
    keyword("NO_AXIS_PTS_X", POSITION_DATATYPE),
    keyword("NO_AXIS_PTS_Y", POSITION_DATATYPE),
    keyword("NO_AXIS_PTS_Z", POSITION_DATATYPE),
    keyword(
        "RESERVED",
        &[
            p!("position", UINT),
            p!("data_size", ParamKind::Enum(DataTypeSize::TAGS)),
        ],
    ),
    keyword("STATIC_RECORD_LAYOUT", &[]),
    // UNIT
    block(
        "UNIT",
        &[
            p!("name", IDENT),
            p!("long_identifier", STRING),
            p!("display", STRING),
            p!("unit_type", ParamKind::Enum(UnitType::TAGS)),
        ],
        &[
            zero_or_one!("REF_UNIT"),
            zero_or_one!("SI_EXPONENTS"),
            zero_or_one!("UNIT_CONVERSION"),
        ],
    ),
    keyword(
        "SI_EXPONENTS",
        &[
            p!("length", INT),
            p!("mass", INT),
            p!("time", INT),
            p!("electric_current", INT),
            p!("temperature", INT),
            p!("amount_of_substance", INT),
            p!("luminous_intensity", INT),
        ],
    ),
    keyword(
        "UNIT_CONVERSION",
        &[p!("gradient", FLOAT), p!("offset", FLOAT)],
    ),
];

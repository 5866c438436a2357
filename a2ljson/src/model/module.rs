use serde::{Deserialize, Serialize};

use super::{
    AxisPts, ByteOrderEnum, Characteristic, CompuMethod, CompuTab, CompuVtab, CompuVtabRange,
    DepositMode, Function, Group, Measurement, MemoryAttribute, MemoryType, PrgType, RawBlock,
    RawItem, RecordLayout, Unit, impl_object_name,
};
use crate::blockdata::{A2lObject, BlockData, Item, Value};
use crate::itemlist::ItemList;

/// A module describes one ECU: its measurements, calibration objects and conversions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub name: String,
    pub long_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a2ml: Option<A2ml>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_par: Option<ModPar>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mod_common: Option<ModCommon>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub characteristic: ItemList<Characteristic>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub axis_pts: ItemList<AxisPts>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub measurement: ItemList<Measurement>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub compu_method: ItemList<CompuMethod>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub compu_tab: ItemList<CompuTab>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub compu_vtab: ItemList<CompuVtab>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub compu_vtab_range: ItemList<CompuVtabRange>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub function: ItemList<Function>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub group: ItemList<Group>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub record_layout: ItemList<RecordLayout>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub unit: ItemList<Unit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// The A2ML block, which declares the format of the IF_DATA blocks.
///
/// A2ML is a language of its own, so the text is kept exactly as it was written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2ml {
    pub text: String,
}

/// Interface specific data. The content is not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IfData {
    pub name: String,
    /// parameters and blocks after the name, in the order they were written
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "super::raw::nested_blocks"
    )]
    pub content: Vec<RawItem>,
}

/// `MOD_PAR`: management data of the module
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModPar {
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub addr_epk: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub epk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_interfaces: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ecu_calibration_offset: Option<i32>,
    #[serde(default, skip_serializing_if = "ItemList::is_empty")]
    pub memory_segment: ItemList<MemorySegment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_constant: Vec<SystemConstant>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemorySegment {
    pub name: String,
    pub long_identifier: String,
    pub prg_type: PrgType,
    pub memory_type: MemoryType,
    pub attribute: MemoryAttribute,
    pub address: u32,
    pub size: u32,
    /// the five offsets; their meaning depends on the memory type
    pub offset: [i32; 5],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConstant {
    pub name: String,
    pub value: String,
}

/// `MOD_COMMON`: module wide defaults for the memory layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModCommon {
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s_rec_layout: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit: Option<DepositMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byte_order: Option<ByteOrderEnum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_size: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_byte: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_word: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_long: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_int64: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_float16_ieee: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_float32_ieee: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignment_float64_ieee: Option<u16>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

impl_object_name!(Module, MemorySegment);

impl Module {
    #[must_use]
    pub fn new(name: &str, long_identifier: &str) -> Self {
        Self {
            name: name.to_string(),
            long_identifier: long_identifier.to_string(),
            ..Self::default()
        }
    }
}

impl A2lObject for Module {
    const TAG: &'static str = "MODULE";

    fn from_data(mut data: BlockData) -> Self {
        let mut module = Module::new(&data.text(0), &data.text(1));
        for item in data.take_items() {
            match item {
                Item::Typed(child) => match child.tag {
                    "A2ML" => module.a2ml = Some(A2ml::from_data(child)),
                    "MOD_PAR" => module.mod_par = Some(ModPar::from_data(child)),
                    "MOD_COMMON" => module.mod_common = Some(ModCommon::from_data(child)),
                    "IF_DATA" => module.if_data.push(IfData::from_data(child)),
                    "CHARACTERISTIC" => module
                        .characteristic
                        .push(Characteristic::from_data(child)),
                    "AXIS_PTS" => module.axis_pts.push(AxisPts::from_data(child)),
                    "MEASUREMENT" => module.measurement.push(Measurement::from_data(child)),
                    "COMPU_METHOD" => module.compu_method.push(CompuMethod::from_data(child)),
                    "COMPU_TAB" => module.compu_tab.push(CompuTab::from_data(child)),
                    "COMPU_VTAB" => module.compu_vtab.push(CompuVtab::from_data(child)),
                    "COMPU_VTAB_RANGE" => module
                        .compu_vtab_range
                        .push(CompuVtabRange::from_data(child)),
                    "FUNCTION" => module.function.push(Function::from_data(child)),
                    "GROUP" => module.group.push(Group::from_data(child)),
                    "RECORD_LAYOUT" => module.record_layout.push(RecordLayout::from_data(child)),
                    "UNIT" => module.unit.push(Unit::from_data(child)),
                    _ => {}
                },
                Item::Raw(raw) => module.unknown.push(raw),
            }
        }
        module
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![Value::ident(&self.name), Value::text(&self.long_identifier)],
        );
        data.add_object(self.a2ml.as_ref());
        data.add_object(self.mod_par.as_ref());
        data.add_object(self.mod_common.as_ref());
        data.add_objects(&self.if_data);
        data.add_objects(&self.characteristic);
        data.add_objects(&self.axis_pts);
        data.add_objects(&self.measurement);
        data.add_objects(&self.compu_method);
        data.add_objects(&self.compu_tab);
        data.add_objects(&self.compu_vtab);
        data.add_objects(&self.compu_vtab_range);
        data.add_objects(&self.function);
        data.add_objects(&self.group);
        data.add_objects(&self.record_layout);
        data.add_objects(&self.unit);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for A2ml {
    const TAG: &'static str = "A2ML";

    fn from_data(mut data: BlockData) -> Self {
        Self { text: data.text(0) }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(Self::TAG, vec![Value::Verbatim(self.text.clone())])
    }
}

impl A2lObject for IfData {
    const TAG: &'static str = "IF_DATA";

    fn from_data(mut data: BlockData) -> Self {
        Self {
            name: data.text(0),
            content: data.raw_content,
        }
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::ident(&self.name)]);
        data.raw_content.clone_from(&self.content);
        data
    }
}

impl A2lObject for ModPar {
    const TAG: &'static str = "MOD_PAR";

    fn from_data(mut data: BlockData) -> Self {
        let mut mod_par = ModPar {
            comment: data.text(0),
            ..ModPar::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "VERSION" => mod_par.version = Some(child.text(0)),
                    "ADDR_EPK" => mod_par.addr_epk.push(child.int(0)),
                    "EPK" => mod_par.epk = Some(child.text(0)),
                    "SUPPLIER" => mod_par.supplier = Some(child.text(0)),
                    "CUSTOMER" => mod_par.customer = Some(child.text(0)),
                    "CUSTOMER_NO" => mod_par.customer_no = Some(child.text(0)),
                    "USER" => mod_par.user = Some(child.text(0)),
                    "PHONE_NO" => mod_par.phone_no = Some(child.text(0)),
                    "ECU" => mod_par.ecu = Some(child.text(0)),
                    "CPU_TYPE" => mod_par.cpu_type = Some(child.text(0)),
                    "NO_OF_INTERFACES" => mod_par.no_of_interfaces = Some(child.int(0)),
                    "ECU_CALIBRATION_OFFSET" => {
                        mod_par.ecu_calibration_offset = Some(child.int(0));
                    }
                    "MEMORY_SEGMENT" => mod_par
                        .memory_segment
                        .push(MemorySegment::from_data(child)),
                    "SYSTEM_CONSTANT" => mod_par
                        .system_constant
                        .push(SystemConstant::from_data(child)),
                    _ => {}
                },
                Item::Raw(raw) => mod_par.unknown.push(raw),
            }
        }
        mod_par
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::text(&self.comment)]);
        data.add_text("VERSION", self.version.as_ref());
        for address in &self.addr_epk {
            data.add_int("ADDR_EPK", Some(*address));
        }
        data.add_text("EPK", self.epk.as_ref());
        data.add_text("SUPPLIER", self.supplier.as_ref());
        data.add_text("CUSTOMER", self.customer.as_ref());
        data.add_text("CUSTOMER_NO", self.customer_no.as_ref());
        data.add_text("USER", self.user.as_ref());
        data.add_text("PHONE_NO", self.phone_no.as_ref());
        data.add_text("ECU", self.ecu.as_ref());
        data.add_text("CPU_TYPE", self.cpu_type.as_ref());
        data.add_int("NO_OF_INTERFACES", self.no_of_interfaces);
        data.add_int("ECU_CALIBRATION_OFFSET", self.ecu_calibration_offset);
        data.add_objects(&self.memory_segment);
        data.add_objects(&self.system_constant);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for MemorySegment {
    const TAG: &'static str = "MEMORY_SEGMENT";

    fn from_data(mut data: BlockData) -> Self {
        let mut segment = MemorySegment {
            name: data.text(0),
            long_identifier: data.text(1),
            prg_type: data.enumeration(2),
            memory_type: data.enumeration(3),
            attribute: data.enumeration(4),
            address: data.int(5),
            size: data.int(6),
            offset: [
                data.int(7),
                data.int(8),
                data.int(9),
                data.int(10),
                data.int(11),
            ],
            if_data: Vec::new(),
            unknown: Vec::new(),
        };
        for item in data.take_items() {
            match item {
                Item::Typed(child) if child.tag == "IF_DATA" => {
                    segment.if_data.push(IfData::from_data(child));
                }
                Item::Typed(_) => {}
                Item::Raw(raw) => segment.unknown.push(raw),
            }
        }
        segment
    }

    fn to_data(&self) -> BlockData {
        let mut params = vec![
            Value::ident(&self.name),
            Value::text(&self.long_identifier),
            Value::enumeration(self.prg_type),
            Value::enumeration(self.memory_type),
            Value::enumeration(self.attribute),
            Value::int(self.address),
            Value::int(self.size),
        ];
        params.extend(self.offset.iter().map(|offset| Value::int(*offset)));
        let mut data = BlockData::with_params(Self::TAG, params);
        data.add_objects(&self.if_data);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for SystemConstant {
    const TAG: &'static str = "SYSTEM_CONSTANT";

    fn from_data(mut data: BlockData) -> Self {
        Self {
            name: data.text(0),
            value: data.text(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::text(&self.name), Value::text(&self.value)],
        )
    }
}

impl A2lObject for ModCommon {
    const TAG: &'static str = "MOD_COMMON";

    fn from_data(mut data: BlockData) -> Self {
        let mut mod_common = ModCommon {
            comment: data.text(0),
            ..ModCommon::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "S_REC_LAYOUT" => mod_common.s_rec_layout = Some(child.text(0)),
                    "DEPOSIT" => mod_common.deposit = Some(child.enumeration(0)),
                    "BYTE_ORDER" => mod_common.byte_order = Some(child.enumeration(0)),
                    "DATA_SIZE" => mod_common.data_size = Some(child.int(0)),
                    "ALIGNMENT_BYTE" => mod_common.alignment_byte = Some(child.int(0)),
                    "ALIGNMENT_WORD" => mod_common.alignment_word = Some(child.int(0)),
                    "ALIGNMENT_LONG" => mod_common.alignment_long = Some(child.int(0)),
                    "ALIGNMENT_INT64" => mod_common.alignment_int64 = Some(child.int(0)),
                    "ALIGNMENT_FLOAT16_IEEE" => {
                        mod_common.alignment_float16_ieee = Some(child.int(0));
                    }
                    "ALIGNMENT_FLOAT32_IEEE" => {
                        mod_common.alignment_float32_ieee = Some(child.int(0));
                    }
                    "ALIGNMENT_FLOAT64_IEEE" => {
                        mod_common.alignment_float64_ieee = Some(child.int(0));
                    }
                    _ => {}
                },
                Item::Raw(raw) => mod_common.unknown.push(raw),
            }
        }
        mod_common
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::text(&self.comment)]);
        data.add_ident("S_REC_LAYOUT", self.s_rec_layout.as_ref());
        data.add_enum("DEPOSIT", self.deposit);
        data.add_enum("BYTE_ORDER", self.byte_order);
        data.add_int("DATA_SIZE", self.data_size);
        data.add_int("ALIGNMENT_BYTE", self.alignment_byte);
        data.add_int("ALIGNMENT_WORD", self.alignment_word);
        data.add_int("ALIGNMENT_LONG", self.alignment_long);
        data.add_int("ALIGNMENT_INT64", self.alignment_int64);
        data.add_int("ALIGNMENT_FLOAT16_IEEE", self.alignment_float16_ieee);
        data.add_int("ALIGNMENT_FLOAT32_IEEE", self.alignment_float32_ieee);
        data.add_int("ALIGNMENT_FLOAT64_IEEE", self.alignment_float64_ieee);
        data.add_raw(&self.unknown);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawValue;

    #[test]
    fn memory_segment_conversion() {
        let segment = MemorySegment {
            name: "Flash".to_string(),
            long_identifier: "code flash".to_string(),
            prg_type: PrgType::Code,
            memory_type: MemoryType::Flash,
            attribute: MemoryAttribute::Intern,
            address: 0x8000_0000,
            size: 0x10_0000,
            offset: [-1, -1, -1, -1, -1],
            if_data: vec![IfData {
                name: "XCP".to_string(),
                content: vec![
                    RawValue::Number("1".to_string()).into(),
                    RawBlock::new("SEGMENT", true).into(),
                ],
            }],
            unknown: vec![],
        };
        let data = segment.to_data();
        assert_eq!(data.params.len(), 12);
        assert_eq!(data.params[5], Value::Int(0x8000_0000));
        assert_eq!(MemorySegment::from_data(data), segment);
    }

    #[test]
    fn mod_par_conversion() {
        let mod_par = ModPar {
            comment: "c".to_string(),
            addr_epk: vec![0x1000, 0x2000],
            epk: Some("EPK_1".to_string()),
            no_of_interfaces: Some(2),
            ecu_calibration_offset: Some(-4),
            system_constant: vec![SystemConstant {
                name: "SYSCONST".to_string(),
                value: "42".to_string(),
            }],
            ..ModPar::default()
        };
        let data = mod_par.to_data();
        // two ADDR_EPK keywords are kept as separate items
        let addr_epk_count = data
            .items
            .iter()
            .filter(|item| matches!(item, Item::Typed(child) if child.tag == "ADDR_EPK"))
            .count();
        assert_eq!(addr_epk_count, 2);
        assert_eq!(ModPar::from_data(data), mod_par);
    }

    #[test]
    fn mod_common_conversion() {
        let mod_common = ModCommon {
            comment: String::new(),
            deposit: Some(DepositMode::Absolute),
            byte_order: Some(ByteOrderEnum::MsbFirst),
            alignment_float64_ieee: Some(8),
            ..ModCommon::default()
        };
        assert_eq!(ModCommon::from_data(mod_common.to_data()), mod_common);
    }
}

use serde::{Deserialize, Serialize};

use super::{A2lObjectName, Annotation, IfData, RawBlock, impl_object_name, is_false};
use crate::blockdata::{A2lObject, BlockData, Item, Value};

/// A function of the ECU software, together with the objects it uses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub long_identifier: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub def_characteristic: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_version: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub in_measurement: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc_measurement: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_measurement: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_characteristic: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_function: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// A user defined grouping of characteristics and measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_name: String,
    pub group_long_identifier: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotation: Vec<Annotation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_list: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub if_data: Vec<IfData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_characteristic: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_measurement: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub root: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_group: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

impl_object_name!(Function);

impl A2lObjectName for Group {
    fn get_name(&self) -> &str {
        &self.group_name
    }
}

impl A2lObject for Function {
    const TAG: &'static str = "FUNCTION";

    fn from_data(mut data: BlockData) -> Self {
        let mut function = Function {
            name: data.text(0),
            long_identifier: data.text(1),
            ..Function::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => function.annotation.push(Annotation::from_data(child)),
                    "DEF_CHARACTERISTIC" => function.def_characteristic = Some(child.text_list()),
                    "FUNCTION_VERSION" => function.function_version = Some(child.text(0)),
                    "IF_DATA" => function.if_data.push(IfData::from_data(child)),
                    "IN_MEASUREMENT" => function.in_measurement = Some(child.text_list()),
                    "LOC_MEASUREMENT" => function.loc_measurement = Some(child.text_list()),
                    "OUT_MEASUREMENT" => function.out_measurement = Some(child.text_list()),
                    "REF_CHARACTERISTIC" => function.ref_characteristic = Some(child.text_list()),
                    "SUB_FUNCTION" => function.sub_function = Some(child.text_list()),
                    _ => {}
                },
                Item::Raw(raw) => function.unknown.push(raw),
            }
        }
        function
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![Value::ident(&self.name), Value::text(&self.long_identifier)],
        );
        data.add_objects(&self.annotation);
        data.add_ident_list("DEF_CHARACTERISTIC", self.def_characteristic.as_ref());
        data.add_text("FUNCTION_VERSION", self.function_version.as_ref());
        data.add_objects(&self.if_data);
        data.add_ident_list("IN_MEASUREMENT", self.in_measurement.as_ref());
        data.add_ident_list("LOC_MEASUREMENT", self.loc_measurement.as_ref());
        data.add_ident_list("OUT_MEASUREMENT", self.out_measurement.as_ref());
        data.add_ident_list("REF_CHARACTERISTIC", self.ref_characteristic.as_ref());
        data.add_ident_list("SUB_FUNCTION", self.sub_function.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for Group {
    const TAG: &'static str = "GROUP";

    fn from_data(mut data: BlockData) -> Self {
        let mut group = Group {
            group_name: data.text(0),
            group_long_identifier: data.text(1),
            ..Group::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "ANNOTATION" => group.annotation.push(Annotation::from_data(child)),
                    "FUNCTION_LIST" => group.function_list = Some(child.text_list()),
                    "IF_DATA" => group.if_data.push(IfData::from_data(child)),
                    "REF_CHARACTERISTIC" => group.ref_characteristic = Some(child.text_list()),
                    "REF_MEASUREMENT" => group.ref_measurement = Some(child.text_list()),
                    "ROOT" => group.root = true,
                    "SUB_GROUP" => group.sub_group = Some(child.text_list()),
                    _ => {}
                },
                Item::Raw(raw) => group.unknown.push(raw),
            }
        }
        group
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.group_name),
                Value::text(&self.group_long_identifier),
            ],
        );
        data.add_objects(&self.annotation);
        data.add_ident_list("FUNCTION_LIST", self.function_list.as_ref());
        data.add_objects(&self.if_data);
        data.add_ident_list("REF_CHARACTERISTIC", self.ref_characteristic.as_ref());
        data.add_ident_list("REF_MEASUREMENT", self.ref_measurement.as_ref());
        data.add_flag("ROOT", self.root);
        data.add_ident_list("SUB_GROUP", self.sub_group.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

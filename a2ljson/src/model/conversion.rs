use serde::{Deserialize, Serialize};

use super::{ConversionType, RawBlock, UnitType, impl_object_name};
use crate::blockdata::{A2lObject, BlockData, Item, Value};

/// Conversion from the internal ECU value to the physical value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompuMethod {
    pub name: String,
    pub long_identifier: String,
    pub conversion_type: ConversionType,
    pub format: String,
    pub unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coeffs: Option<Coeffs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coeffs_linear: Option<CoeffsLinear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compu_tab_ref: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula: Option<Formula>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_string_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// Coefficients of the rational function f(x) = (axx + bx + c) / (dxx + ex + f)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coeffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

/// Coefficients of the linear function f(x) = ax + b
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoeffsLinear {
    pub a: f64,
    pub b: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub fx: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formula_inv: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// Conversion table with numeric output values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompuTab {
    pub name: String,
    pub long_identifier: String,
    pub conversion_type: ConversionType,
    pub number_value_pairs: u16,
    #[serde(default)]
    pub tab_entry: Vec<TabEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value_numeric: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TabEntry {
    pub in_val: f64,
    pub out_val: f64,
}

/// Verbal conversion table: maps values to texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompuVtab {
    pub name: String,
    pub long_identifier: String,
    pub conversion_type: ConversionType,
    pub number_value_pairs: u16,
    #[serde(default)]
    pub value_pairs: Vec<ValuePair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValuePair {
    pub in_val: f64,
    pub out_val: String,
}

/// Verbal conversion table: maps value ranges to texts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompuVtabRange {
    pub name: String,
    pub long_identifier: String,
    pub number_value_triples: u16,
    #[serde(default)]
    pub value_triples: Vec<ValueTriple>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValueTriple {
    pub in_val_min: f64,
    pub in_val_max: f64,
    pub out_val: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub long_identifier: String,
    pub display: String,
    pub unit_type: UnitType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub si_exponents: Option<SiExponents>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_conversion: Option<UnitConversion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// Exponents of the seven SI base units
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiExponents {
    pub length: i16,
    pub mass: i16,
    pub time: i16,
    pub electric_current: i16,
    pub temperature: i16,
    pub amount_of_substance: i16,
    pub luminous_intensity: i16,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub gradient: f64,
    pub offset: f64,
}

impl_object_name!(CompuMethod, CompuTab, CompuVtab, CompuVtabRange, Unit);

impl A2lObject for CompuMethod {
    const TAG: &'static str = "COMPU_METHOD";

    fn from_data(mut data: BlockData) -> Self {
        let mut compu_method = CompuMethod {
            name: data.text(0),
            long_identifier: data.text(1),
            conversion_type: data.enumeration(2),
            format: data.text(3),
            unit: data.text(4),
            ..CompuMethod::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "COEFFS" => compu_method.coeffs = Some(Coeffs::from_data(child)),
                    "COEFFS_LINEAR" => {
                        compu_method.coeffs_linear = Some(CoeffsLinear::from_data(child));
                    }
                    "COMPU_TAB_REF" => compu_method.compu_tab_ref = Some(child.text(0)),
                    "FORMULA" => compu_method.formula = Some(Formula::from_data(child)),
                    "REF_UNIT" => compu_method.ref_unit = Some(child.text(0)),
                    "STATUS_STRING_REF" => compu_method.status_string_ref = Some(child.text(0)),
                    _ => {}
                },
                Item::Raw(raw) => compu_method.unknown.push(raw),
            }
        }
        compu_method
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::enumeration(self.conversion_type),
                Value::text(&self.format),
                Value::text(&self.unit),
            ],
        );
        data.add_object(self.coeffs.as_ref());
        data.add_object(self.coeffs_linear.as_ref());
        data.add_ident("COMPU_TAB_REF", self.compu_tab_ref.as_ref());
        data.add_object(self.formula.as_ref());
        data.add_ident("REF_UNIT", self.ref_unit.as_ref());
        data.add_ident("STATUS_STRING_REF", self.status_string_ref.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for Coeffs {
    const TAG: &'static str = "COEFFS";

    fn from_data(data: BlockData) -> Self {
        Self {
            a: data.float(0),
            b: data.float(1),
            c: data.float(2),
            d: data.float(3),
            e: data.float(4),
            f: data.float(5),
        }
    }

    fn to_data(&self) -> BlockData {
        let coefficients = [self.a, self.b, self.c, self.d, self.e, self.f];
        BlockData::with_params(
            Self::TAG,
            coefficients.into_iter().map(Value::Float).collect(),
        )
    }
}

impl A2lObject for CoeffsLinear {
    const TAG: &'static str = "COEFFS_LINEAR";

    fn from_data(data: BlockData) -> Self {
        Self {
            a: data.float(0),
            b: data.float(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(Self::TAG, vec![Value::Float(self.a), Value::Float(self.b)])
    }
}

impl A2lObject for Formula {
    const TAG: &'static str = "FORMULA";

    fn from_data(mut data: BlockData) -> Self {
        let mut formula = Formula {
            fx: data.text(0),
            ..Formula::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) if child.tag == "FORMULA_INV" => {
                    formula.formula_inv = Some(child.text(0));
                }
                Item::Typed(_) => {}
                Item::Raw(raw) => formula.unknown.push(raw),
            }
        }
        formula
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::text(&self.fx)]);
        data.add_text("FORMULA_INV", self.formula_inv.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for CompuTab {
    const TAG: &'static str = "COMPU_TAB";

    fn from_data(mut data: BlockData) -> Self {
        let mut compu_tab = CompuTab {
            name: data.text(0),
            long_identifier: data.text(1),
            conversion_type: data.enumeration(2),
            number_value_pairs: data.int(3),
            ..CompuTab::default()
        };
        compu_tab.tab_entry = data
            .rows
            .iter()
            .filter_map(|row| match row.as_slice() {
                [in_val, out_val, ..] => Some(TabEntry {
                    in_val: in_val.to_float(),
                    out_val: out_val.to_float(),
                }),
                _ => None,
            })
            .collect();
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "DEFAULT_VALUE" => compu_tab.default_value = Some(child.text(0)),
                    "DEFAULT_VALUE_NUMERIC" => {
                        compu_tab.default_value_numeric = Some(child.float(0));
                    }
                    _ => {}
                },
                Item::Raw(raw) => compu_tab.unknown.push(raw),
            }
        }
        compu_tab
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::enumeration(self.conversion_type),
                Value::int(self.number_value_pairs),
            ],
        );
        data.rows = self
            .tab_entry
            .iter()
            .map(|entry| vec![Value::Float(entry.in_val), Value::Float(entry.out_val)])
            .collect();
        data.add_text("DEFAULT_VALUE", self.default_value.as_ref());
        data.add_float("DEFAULT_VALUE_NUMERIC", self.default_value_numeric);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for CompuVtab {
    const TAG: &'static str = "COMPU_VTAB";

    fn from_data(mut data: BlockData) -> Self {
        let mut compu_vtab = CompuVtab {
            name: data.text(0),
            long_identifier: data.text(1),
            conversion_type: data.enumeration(2),
            number_value_pairs: data.int(3),
            ..CompuVtab::default()
        };
        compu_vtab.value_pairs = data
            .rows
            .iter_mut()
            .filter_map(|row| match row.as_mut_slice() {
                [in_val, out_val, ..] => Some(ValuePair {
                    in_val: in_val.to_float(),
                    out_val: out_val.take_text(),
                }),
                _ => None,
            })
            .collect();
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) if child.tag == "DEFAULT_VALUE" => {
                    compu_vtab.default_value = Some(child.text(0));
                }
                Item::Typed(_) => {}
                Item::Raw(raw) => compu_vtab.unknown.push(raw),
            }
        }
        compu_vtab
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::enumeration(self.conversion_type),
                Value::int(self.number_value_pairs),
            ],
        );
        data.rows = self
            .value_pairs
            .iter()
            .map(|pair| vec![Value::Float(pair.in_val), Value::text(&pair.out_val)])
            .collect();
        data.add_text("DEFAULT_VALUE", self.default_value.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for CompuVtabRange {
    const TAG: &'static str = "COMPU_VTAB_RANGE";

    fn from_data(mut data: BlockData) -> Self {
        let mut compu_vtab_range = CompuVtabRange {
            name: data.text(0),
            long_identifier: data.text(1),
            number_value_triples: data.int(2),
            ..CompuVtabRange::default()
        };
        compu_vtab_range.value_triples = data
            .rows
            .iter_mut()
            .filter_map(|row| match row.as_mut_slice() {
                [in_val_min, in_val_max, out_val, ..] => Some(ValueTriple {
                    in_val_min: in_val_min.to_float(),
                    in_val_max: in_val_max.to_float(),
                    out_val: out_val.take_text(),
                }),
                _ => None,
            })
            .collect();
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) if child.tag == "DEFAULT_VALUE" => {
                    compu_vtab_range.default_value = Some(child.text(0));
                }
                Item::Typed(_) => {}
                Item::Raw(raw) => compu_vtab_range.unknown.push(raw),
            }
        }
        compu_vtab_range
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::int(self.number_value_triples),
            ],
        );
        data.rows = self
            .value_triples
            .iter()
            .map(|triple| {
                vec![
                    Value::Float(triple.in_val_min),
                    Value::Float(triple.in_val_max),
                    Value::text(&triple.out_val),
                ]
            })
            .collect();
        data.add_text("DEFAULT_VALUE", self.default_value.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for Unit {
    const TAG: &'static str = "UNIT";

    fn from_data(mut data: BlockData) -> Self {
        let mut unit = Unit {
            name: data.text(0),
            long_identifier: data.text(1),
            display: data.text(2),
            unit_type: data.enumeration(3),
            ..Unit::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "REF_UNIT" => unit.ref_unit = Some(child.text(0)),
                    "SI_EXPONENTS" => unit.si_exponents = Some(SiExponents::from_data(child)),
                    "UNIT_CONVERSION" => {
                        unit.unit_conversion = Some(UnitConversion::from_data(child));
                    }
                    _ => {}
                },
                Item::Raw(raw) => unit.unknown.push(raw),
            }
        }
        unit
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![
                Value::ident(&self.name),
                Value::text(&self.long_identifier),
                Value::text(&self.display),
                Value::enumeration(self.unit_type),
            ],
        );
        data.add_ident("REF_UNIT", self.ref_unit.as_ref());
        data.add_object(self.si_exponents.as_ref());
        data.add_object(self.unit_conversion.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for SiExponents {
    const TAG: &'static str = "SI_EXPONENTS";

    fn from_data(data: BlockData) -> Self {
        Self {
            length: data.int(0),
            mass: data.int(1),
            time: data.int(2),
            electric_current: data.int(3),
            temperature: data.int(4),
            amount_of_substance: data.int(5),
            luminous_intensity: data.int(6),
        }
    }

    fn to_data(&self) -> BlockData {
        let exponents = [
            self.length,
            self.mass,
            self.time,
            self.electric_current,
            self.temperature,
            self.amount_of_substance,
            self.luminous_intensity,
        ];
        BlockData::with_params(Self::TAG, exponents.into_iter().map(Value::int).collect())
    }
}

impl A2lObject for UnitConversion {
    const TAG: &'static str = "UNIT_CONVERSION";

    fn from_data(data: BlockData) -> Self {
        Self {
            gradient: data.float(0),
            offset: data.float(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::Float(self.gradient), Value::Float(self.offset)],
        )
    }
}

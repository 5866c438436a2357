use serde::{Deserialize, Serialize};

use super::{
    AddrType, DataType, DataTypeSize, IndexMode, IndexOrder, RawBlock, impl_object_name, is_false,
};
use crate::blockdata::{A2lObject, BlockData, Item, Value};

/// Memory layout of the data of a characteristic or axis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordLayout {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fnc_values: Option<FncValues>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification: Option<Identification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pts_x: Option<AxisPtsX>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pts_y: Option<AxisPtsY>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub axis_pts_z: Option<AxisPtsZ>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_axis_pts_x: Option<NoAxisPtsX>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_axis_pts_y: Option<NoAxisPtsY>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_axis_pts_z: Option<NoAxisPtsZ>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reserved: Vec<Reserved>,
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
    #[serde(default, skip_serializing_if = "is_false")]
    pub static_record_layout: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FncValues {
    pub position: u16,
    pub datatype: DataType,
    pub index_mode: IndexMode,
    pub address_type: AddrType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub position: u16,
    pub datatype: DataType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reserved {
    pub position: u16,
    pub data_size: DataTypeSize,
}

// the three axes share their layout keywords, only the tag differs
macro_rules! axis_layout {
    ($axis_pts:ident => $axis_pts_tag:literal, $no_axis_pts:ident => $no_axis_pts_tag:literal) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $axis_pts {
            pub position: u16,
            pub datatype: DataType,
            pub index_incr: IndexOrder,
            pub addressing: AddrType,
        }

        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $no_axis_pts {
            pub position: u16,
            pub datatype: DataType,
        }

        impl A2lObject for $axis_pts {
            const TAG: &'static str = $axis_pts_tag;

            fn from_data(data: BlockData) -> Self {
                Self {
                    position: data.int(0),
                    datatype: data.enumeration(1),
                    index_incr: data.enumeration(2),
                    addressing: data.enumeration(3),
                }
            }

            fn to_data(&self) -> BlockData {
                BlockData::with_params(
                    Self::TAG,
                    vec![
                        Value::int(self.position),
                        Value::enumeration(self.datatype),
                        Value::enumeration(self.index_incr),
                        Value::enumeration(self.addressing),
                    ],
                )
            }
        }

        impl A2lObject for $no_axis_pts {
            const TAG: &'static str = $no_axis_pts_tag;

            fn from_data(data: BlockData) -> Self {
                Self {
                    position: data.int(0),
                    datatype: data.enumeration(1),
                }
            }

            fn to_data(&self) -> BlockData {
                BlockData::with_params(
                    Self::TAG,
                    vec![Value::int(self.position), Value::enumeration(self.datatype)],
                )
            }
        }
    };
}

axis_layout!(AxisPtsX => "AXIS_PTS_X", NoAxisPtsX => "NO_AXIS_PTS_X");
axis_layout!(AxisPtsY => "AXIS_PTS_Y", NoAxisPtsY => "NO_AXIS_PTS_Y");
axis_layout!(AxisPtsZ => "AXIS_PTS_Z", NoAxisPtsZ => "NO_AXIS_PTS_Z");

impl_object_name!(RecordLayout);

impl A2lObject for RecordLayout {
    const TAG: &'static str = "RECORD_LAYOUT";

    fn from_data(mut data: BlockData) -> Self {
        let mut layout = RecordLayout {
            name: data.text(0),
            ..RecordLayout::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(child) => match child.tag {
                    "FNC_VALUES" => layout.fnc_values = Some(FncValues::from_data(child)),
                    "IDENTIFICATION" => {
                        layout.identification = Some(Identification::from_data(child));
                    }
                    "AXIS_PTS_X" => layout.axis_pts_x = Some(AxisPtsX::from_data(child)),
                    "AXIS_PTS_Y" => layout.axis_pts_y = Some(AxisPtsY::from_data(child)),
                    "AXIS_PTS_Z" => layout.axis_pts_z = Some(AxisPtsZ::from_data(child)),
                    "NO_AXIS_PTS_X" => layout.no_axis_pts_x = Some(NoAxisPtsX::from_data(child)),
                    "NO_AXIS_PTS_Y" => layout.no_axis_pts_y = Some(NoAxisPtsY::from_data(child)),
                    "NO_AXIS_PTS_Z" => layout.no_axis_pts_z = Some(NoAxisPtsZ::from_data(child)),
                    "RESERVED" => layout.reserved.push(Reserved::from_data(child)),
                    "ALIGNMENT_BYTE" => layout.alignment_byte = Some(child.int(0)),
                    "ALIGNMENT_WORD" => layout.alignment_word = Some(child.int(0)),
                    "ALIGNMENT_LONG" => layout.alignment_long = Some(child.int(0)),
                    "ALIGNMENT_INT64" => layout.alignment_int64 = Some(child.int(0)),
                    "ALIGNMENT_FLOAT16_IEEE" => layout.alignment_float16_ieee = Some(child.int(0)),
                    "ALIGNMENT_FLOAT32_IEEE" => layout.alignment_float32_ieee = Some(child.int(0)),
                    "ALIGNMENT_FLOAT64_IEEE" => layout.alignment_float64_ieee = Some(child.int(0)),
                    "STATIC_RECORD_LAYOUT" => layout.static_record_layout = true,
                    _ => {}
                },
                Item::Raw(raw) => layout.unknown.push(raw),
            }
        }
        layout
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::ident(&self.name)]);
        data.add_object(self.fnc_values.as_ref());
        data.add_object(self.identification.as_ref());
        data.add_object(self.axis_pts_x.as_ref());
        data.add_object(self.axis_pts_y.as_ref());
        data.add_object(self.axis_pts_z.as_ref());
        data.add_object(self.no_axis_pts_x.as_ref());
        data.add_object(self.no_axis_pts_y.as_ref());
        data.add_object(self.no_axis_pts_z.as_ref());
        data.add_objects(&self.reserved);
        data.add_int("ALIGNMENT_BYTE", self.alignment_byte);
        data.add_int("ALIGNMENT_WORD", self.alignment_word);
        data.add_int("ALIGNMENT_LONG", self.alignment_long);
        data.add_int("ALIGNMENT_INT64", self.alignment_int64);
        data.add_int("ALIGNMENT_FLOAT16_IEEE", self.alignment_float16_ieee);
        data.add_int("ALIGNMENT_FLOAT32_IEEE", self.alignment_float32_ieee);
        data.add_int("ALIGNMENT_FLOAT64_IEEE", self.alignment_float64_ieee);
        data.add_flag("STATIC_RECORD_LAYOUT", self.static_record_layout);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for FncValues {
    const TAG: &'static str = "FNC_VALUES";

    fn from_data(data: BlockData) -> Self {
        Self {
            position: data.int(0),
            datatype: data.enumeration(1),
            index_mode: data.enumeration(2),
            address_type: data.enumeration(3),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![
                Value::int(self.position),
                Value::enumeration(self.datatype),
                Value::enumeration(self.index_mode),
                Value::enumeration(self.address_type),
            ],
        )
    }
}

impl A2lObject for Identification {
    const TAG: &'static str = "IDENTIFICATION";

    fn from_data(data: BlockData) -> Self {
        Self {
            position: data.int(0),
            datatype: data.enumeration(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::int(self.position), Value::enumeration(self.datatype)],
        )
    }
}

impl A2lObject for Reserved {
    const TAG: &'static str = "RESERVED";

    fn from_data(data: BlockData) -> Self {
        Self {
            position: data.int(0),
            data_size: data.enumeration(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::int(self.position), Value::enumeration(self.data_size)],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_layout_conversion() {
        let layout = RecordLayout {
            name: "RL_MAP".to_string(),
            fnc_values: Some(FncValues {
                position: 7,
                datatype: DataType::Float32Ieee,
                index_mode: IndexMode::ColumnDir,
                address_type: AddrType::Direct,
            }),
            axis_pts_y: Some(AxisPtsY {
                position: 4,
                datatype: DataType::Sword,
                index_incr: IndexOrder::IndexDecr,
                addressing: AddrType::Direct,
            }),
            no_axis_pts_x: Some(NoAxisPtsX {
                position: 1,
                datatype: DataType::Ubyte,
            }),
            reserved: vec![
                Reserved {
                    position: 2,
                    data_size: DataTypeSize::Byte,
                },
                Reserved {
                    position: 3,
                    data_size: DataTypeSize::Word,
                },
            ],
            alignment_long: Some(4),
            static_record_layout: true,
            ..RecordLayout::default()
        };
        let data = layout.to_data();
        assert_eq!(data.items.len(), 7);
        assert_eq!(RecordLayout::from_data(data), layout);
    }
}

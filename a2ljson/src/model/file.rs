use serde::{Deserialize, Serialize};

use super::{Module, RawBlock};
use crate::blockdata::{A2lObject, BlockData, Item, Value};
use crate::itemlist::ItemList;
use crate::specification::FILE_TAG;

/// The root of the model: the content of an a2l file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct A2lFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asap2_version: Option<Asap2Version>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub a2ml_version: Option<A2mlVersion>,
    pub project: Project,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

/// `ASAP2_VERSION`: version of the a2l standard used by the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asap2Version {
    pub version_no: u16,
    pub upgrade_no: u16,
}

/// `A2ML_VERSION`: version of the A2ML language used in the file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct A2mlVersion {
    pub version_no: u16,
    pub upgrade_no: u16,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub long_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<Header>,
    pub module: ItemList<Module>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_no: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unknown: Vec<RawBlock>,
}

impl A2lFile {
    /// create a file containing the given project
    #[must_use]
    pub fn new(project: Project) -> Self {
        Self {
            asap2_version: None,
            a2ml_version: None,
            project,
            unknown: Vec::new(),
        }
    }
}

impl Project {
    #[must_use]
    pub fn new(name: &str, long_identifier: &str) -> Self {
        Self {
            name: name.to_string(),
            long_identifier: long_identifier.to_string(),
            ..Self::default()
        }
    }
}

impl A2lObject for A2lFile {
    const TAG: &'static str = FILE_TAG;

    fn from_data(mut data: BlockData) -> Self {
        let mut file = A2lFile::default();
        for item in data.take_items() {
            match item {
                Item::Typed(child) => match child.tag {
                    "ASAP2_VERSION" => file.asap2_version = Some(Asap2Version::from_data(child)),
                    "A2ML_VERSION" => file.a2ml_version = Some(A2mlVersion::from_data(child)),
                    "PROJECT" => file.project = Project::from_data(child),
                    _ => {}
                },
                Item::Raw(raw) => file.unknown.push(raw),
            }
        }
        file
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::new(Self::TAG);
        data.add_object(self.asap2_version.as_ref());
        data.add_object(self.a2ml_version.as_ref());
        data.add_object(Some(&self.project));
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for Asap2Version {
    const TAG: &'static str = "ASAP2_VERSION";

    fn from_data(data: BlockData) -> Self {
        Self {
            version_no: data.int(0),
            upgrade_no: data.int(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::int(self.version_no), Value::int(self.upgrade_no)],
        )
    }
}

impl A2lObject for A2mlVersion {
    const TAG: &'static str = "A2ML_VERSION";

    fn from_data(data: BlockData) -> Self {
        Self {
            version_no: data.int(0),
            upgrade_no: data.int(1),
        }
    }

    fn to_data(&self) -> BlockData {
        BlockData::with_params(
            Self::TAG,
            vec![Value::int(self.version_no), Value::int(self.upgrade_no)],
        )
    }
}

impl A2lObject for Project {
    const TAG: &'static str = "PROJECT";

    fn from_data(mut data: BlockData) -> Self {
        let mut project = Project::new(&data.text(0), &data.text(1));
        for item in data.take_items() {
            match item {
                Item::Typed(child) => match child.tag {
                    "HEADER" => project.header = Some(Header::from_data(child)),
                    "MODULE" => project.module.push(Module::from_data(child)),
                    _ => {}
                },
                Item::Raw(raw) => project.unknown.push(raw),
            }
        }
        project
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(
            Self::TAG,
            vec![Value::ident(&self.name), Value::text(&self.long_identifier)],
        );
        data.add_object(self.header.as_ref());
        data.add_objects(&self.module);
        data.add_raw(&self.unknown);
        data
    }
}

impl A2lObject for Header {
    const TAG: &'static str = "HEADER";

    fn from_data(mut data: BlockData) -> Self {
        let mut header = Header {
            comment: data.text(0),
            ..Header::default()
        };
        for item in data.take_items() {
            match item {
                Item::Typed(mut child) => match child.tag {
                    "VERSION" => header.version = Some(child.text(0)),
                    "PROJECT_NO" => header.project_no = Some(child.text(0)),
                    _ => {}
                },
                Item::Raw(raw) => header.unknown.push(raw),
            }
        }
        header
    }

    fn to_data(&self) -> BlockData {
        let mut data = BlockData::with_params(Self::TAG, vec![Value::text(&self.comment)]);
        data.add_text("VERSION", self.version.as_ref());
        data.add_ident("PROJECT_NO", self.project_no.as_ref());
        data.add_raw(&self.unknown);
        data
    }
}

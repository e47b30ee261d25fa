//! Decoders for the payload of each known section.
//!
//! Every decoder receives a reader bounded to the section payload. The
//! scanner in [crate::decode] continues at the declared end of the section
//! whatever a decoder consumed.
mod code;
mod custom;
mod data;
mod element;
mod externals;
mod global;
mod name;
mod plain;

pub use code::{
    DecodeCodeEntryError, DecodeCodeError, DecodeCodeLocalsError, DecodeCodeSectionError,
};
pub use custom::DecodeCustomSectionError;
pub use data::{DecodeDataSectionError, DecodeDataSegmentError};
pub use element::{DecodeElementError, DecodeElementKindError, DecodeElementSectionError};
pub use externals::{
    DecodeExportError, DecodeExportSectionError, DecodeExternKindError, DecodeImportError,
    DecodeImportSectionError,
};
pub use global::{DecodeGlobalError, DecodeGlobalSectionError};
pub use name::{DecodeIndirectNameAssocError, DecodeNameAssocError, DecodeNameSectionError};
pub use plain::{
    DecodeDataCountSectionError, DecodeFunctionSectionError, DecodeMemorySectionError,
    DecodeStartSectionError, DecodeTableSectionError, DecodeTypeSectionError,
};

pub(crate) use code::decode_code_section;
pub(crate) use custom::decode_custom_section;
pub(crate) use data::decode_data_section;
pub(crate) use element::decode_element_section;
pub(crate) use externals::{decode_export_section, decode_import_section};
pub(crate) use global::decode_global_section;
pub(crate) use name::decode_name_section;
pub(crate) use plain::{
    decode_data_count_section, decode_function_section, decode_memory_section,
    decode_start_section, decode_table_section, decode_type_section,
};

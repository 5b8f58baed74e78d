//! Document model - elements, control descriptors, tables and zones
//!
//! Everything here is plain data; the transformations live in `format` and
//! the editing logic in `control`.

pub mod control;
pub mod document;
pub mod element;
pub mod ids;
pub mod range;
pub mod sequence;
pub mod table;

pub use control::{
    ControlDescriptor, ControlProperties, ControlType, GetValueOption, SelectExclusiveOptions,
    SetPropertiesOption, SetValueOption, ValueSet, DEFAULT_DELIMITER,
};
pub use document::{DocumentData, Zone};
pub use element::{
    AreaDescriptor, AreaMode, ControlComponent, Element, ElementType, ListStyle, ListType,
    OptionState, RowFlex, TextStyle, TitleLevel, ZERO,
};
pub use ids::IdGenerator;
pub use range::Range;
pub use sequence::{control_run_bounds, find_control_run, splice_element_list, SpliceOptions};
pub use table::{CellPath, PositionContext, TableCell, TableRow};

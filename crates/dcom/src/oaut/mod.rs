//! OLE Automation wire types (MS-OAUT)
//!
//! VARIANT, byte SAFEARRAY, DISPPARAMS and EXCEPINFO, as carried by
//! IDispatch and the dual interfaces built on it.

mod dispparams;
mod safearray;
mod variant;

pub use dispparams::{DispParams, ExcepInfo, DISPID_PROPERTYPUT};
pub use safearray::{SafeArray, SafeArrayBound, FADF_HAVEVARTYPE, SF_I1};
pub use variant::{vt, Variant, VariantBool};

//! DISPPARAMS and EXCEPINFO (MS-OAUT 2.2.33, 2.2.36)

use super::Variant;
use midl_ndr::{BString, ConformantArray, NdrDecode, NdrEncode, NdrError, NdrReader, NdrWriter};

/// Arguments to `IDispatch::Invoke`
///
/// ```text
/// *rgvarg *rgdispidNamedArgs cArgs(4) cNamedArgs(4)
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DispParams {
    /// Arguments in reverse order
    pub args: Option<ConformantArray<Option<Variant>>>,
    pub named_args: Option<ConformantArray<i32>>,
}

impl DispParams {
    /// Positional arguments, given in call order
    pub fn positional(args: Vec<Variant>) -> Self {
        let mut slots: Vec<Option<Variant>> = args.into_iter().map(Some).collect();
        slots.reverse();
        Self {
            args: (!slots.is_empty()).then(|| ConformantArray::new(slots)),
            named_args: None,
        }
    }

    /// Single named argument, as used for property puts
    pub fn property_put(value: Variant) -> Self {
        Self {
            args: Some(ConformantArray::new(vec![Some(value)])),
            named_args: Some(ConformantArray::new(vec![DISPID_PROPERTYPUT])),
        }
    }

    pub fn arg_count(&self) -> usize {
        self.args.as_ref().map_or(0, ConformantArray::len)
    }

    pub fn named_arg_count(&self) -> usize {
        self.named_args.as_ref().map_or(0, ConformantArray::len)
    }
}

/// DISPID of the value argument in a property put
pub const DISPID_PROPERTYPUT: i32 = -3;

impl NdrEncode for DispParams {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        let args = u32::try_from(self.arg_count()).map_err(|_| NdrError::IntegerOverflow)?;
        let named = u32::try_from(self.named_arg_count()).map_err(|_| NdrError::IntegerOverflow)?;
        w.write(&self.args)?;
        w.write(&self.named_args)?;
        w.put_u32(args);
        w.put_u32(named);
        Ok(())
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_deferred(&self.args)?;
        w.write_deferred(&self.named_args)
    }
}

impl NdrDecode for DispParams {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let args = r.read()?;
        let named_args = r.read()?;
        let _args = r.get_u32()?;
        let _named = r.get_u32()?;
        Ok(Self { args, named_args })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        r.read_deferred(&mut self.args)?;
        r.read_deferred(&mut self.named_args)
    }
}

/// Exception raised by `IDispatch::Invoke`
///
/// ```text
/// wCode(2) wReserved(2) *bstrSource *bstrDescription *bstrHelpFile
/// dwHelpContext(4) pvReserved(4) pfnDeferredFillIn(4) scode(4)
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExcepInfo {
    pub code: u16,
    pub source: Option<BString>,
    pub description: Option<BString>,
    pub help_file: Option<BString>,
    pub help_context: u32,
    pub scode: i32,
}

impl NdrEncode for ExcepInfo {
    fn ndr_encode(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.put_u16(self.code);
        w.put_u16(0);
        w.write(&self.source)?;
        w.write(&self.description)?;
        w.write(&self.help_file)?;
        w.put_u32(self.help_context);
        w.put_u32(0);
        w.put_u32(0);
        w.put_i32(self.scode);
        Ok(())
    }

    fn ndr_encode_deferred(&self, w: &mut NdrWriter) -> midl_ndr::Result<()> {
        w.write_deferred(&self.source)?;
        w.write_deferred(&self.description)?;
        w.write_deferred(&self.help_file)
    }
}

impl NdrDecode for ExcepInfo {
    fn ndr_decode(r: &mut NdrReader) -> midl_ndr::Result<Self> {
        let code = r.get_u16()?;
        let _reserved = r.get_u16()?;
        let source = r.read()?;
        let description = r.read()?;
        let help_file = r.read()?;
        let help_context = r.get_u32()?;
        let _pv_reserved = r.get_u32()?;
        let _deferred_fill_in = r.get_u32()?;
        let scode = r.get_i32()?;
        Ok(Self {
            code,
            source,
            description,
            help_file,
            help_context,
            scode,
        })
    }

    fn ndr_decode_deferred(&mut self, r: &mut NdrReader) -> midl_ndr::Result<()> {
        r.read_deferred(&mut self.source)?;
        r.read_deferred(&mut self.description)?;
        r.read_deferred(&mut self.help_file)
    }
}

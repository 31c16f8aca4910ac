//! Operation schema macro
//!
//! [`dcom_operations!`](crate::dcom_operations) turns a table of operations
//! into the wire types and client methods of one interface. For every entry
//! it generates:
//!
//! - `$op`: the [`Operation`](crate::Operation) holding both envelopes, the
//!   `in` and `out` fields and the returned HRESULT, with `OPNUM`, `NAME`,
//!   `IN_FIELDS` and `OUT_FIELDS` constants
//! - `$req`: the `in` fields plus an optional ORPCTHIS (a fresh one is used
//!   when absent)
//! - `$resp`: ORPCTHAT, the `out` fields and `ret`
//! - conversions between the three
//! - `$client::$method(request, opts)`, which runs the operation through
//!   the client's [`ObjectClient`](crate::ObjectClient)
//!
//! Fields are written in table order, each one followed by its pointees.
//! Pointer-valued fields are `Option<T>`; `None` is a null referent.
//!
//! The client type must provide `fn object(&self) -> &ObjectClient`.
//!
//! ```ignore
//! dcom_operations! {
//!     interface: "IMSMQMessage4",
//!     client: MessageClient,
//!     operations: {
//!         /// Message priority
//!         fn get_priority => GetPriorityOperation(GetPriorityRequest, GetPriorityResponse) = 17, "Priority" {
//!             in {}
//!             out { priority: i32 = "plPriority" }
//!         }
//!     }
//! }
//! ```

/// Generate operations, request/response types and client methods for one
/// interface.
#[macro_export]
macro_rules! dcom_operations {
    (
        interface: $iface:literal,
        client: $client:ident,
        operations: {
            $(
                $(#[$meta:meta])*
                fn $method:ident => $op:ident($req:ident, $resp:ident) = $opnum:literal, $wire:literal {
                    in { $($in_field:ident : $in_ty:ty = $in_wire:literal),* $(,)? }
                    out { $($out_field:ident : $out_ty:ty = $out_wire:literal),* $(,)? }
                }
            )*
        }
    ) => {
        $(
            #[doc = concat!("`", $iface, "::", $wire, "`, opnum ", stringify!($opnum))]
            #[derive(Clone, Debug, Default, PartialEq)]
            pub struct $op {
                pub this: $crate::OrpcThis,
                pub that: $crate::OrpcThat,
                $(pub $in_field: $in_ty,)*
                $(pub $out_field: $out_ty,)*
                pub ret: i32,
            }

            impl $op {
                pub const OPNUM: u16 = $opnum;
                pub const NAME: &'static str = concat!("/", $iface, "/v0/", $wire);
                /// Wire names of the request fields, in order
                pub const IN_FIELDS: &'static [&'static str] = &[$($in_wire),*];
                /// Wire names of the response fields, in order, `Return` excluded
                pub const OUT_FIELDS: &'static [&'static str] = &[$($out_wire),*];
            }

            impl $crate::Operation for $op {
                fn opnum(&self) -> u16 {
                    Self::OPNUM
                }

                fn name(&self) -> &'static str {
                    Self::NAME
                }

                fn status(&self) -> i32 {
                    self.ret
                }

                fn orpc_this_mut(&mut self) -> &mut $crate::OrpcThis {
                    &mut self.this
                }

                fn orpc_that(&self) -> &$crate::OrpcThat {
                    &self.that
                }

                fn marshal_request(&self, w: &mut $crate::ndr::NdrWriter) -> $crate::ndr::Result<()> {
                    w.write_full(&self.this)?;
                    $(w.write_full(&self.$in_field)?;)*
                    Ok(())
                }

                fn unmarshal_request(&mut self, r: &mut $crate::ndr::NdrReader) -> $crate::ndr::Result<()> {
                    self.this = r.read_full()?;
                    $(self.$in_field = r.read_full()?;)*
                    Ok(())
                }

                fn marshal_response(&self, w: &mut $crate::ndr::NdrWriter) -> $crate::ndr::Result<()> {
                    w.write_full(&self.that)?;
                    $(w.write_full(&self.$out_field)?;)*
                    w.put_i32(self.ret);
                    Ok(())
                }

                fn unmarshal_response(&mut self, r: &mut $crate::ndr::NdrReader) -> $crate::ndr::Result<()> {
                    self.that = r.read_full()?;
                    $(self.$out_field = r.read_full()?;)*
                    self.ret = r.get_i32()?;
                    Ok(())
                }
            }

            #[doc = concat!("Request of `", $iface, "::", $wire, "`")]
            #[derive(Clone, Debug, Default, PartialEq)]
            pub struct $req {
                pub this: ::std::option::Option<$crate::OrpcThis>,
                $(pub $in_field: $in_ty,)*
            }

            impl ::std::convert::From<$req> for $op {
                fn from(req: $req) -> Self {
                    Self {
                        this: req.this.unwrap_or_default(),
                        $($in_field: req.$in_field,)*
                        ..::std::default::Default::default()
                    }
                }
            }

            impl ::std::convert::From<$op> for $req {
                fn from(op: $op) -> Self {
                    Self {
                        this: ::std::option::Option::Some(op.this),
                        $($in_field: op.$in_field,)*
                    }
                }
            }

            #[doc = concat!("Response of `", $iface, "::", $wire, "`")]
            #[derive(Clone, Debug, Default, PartialEq)]
            pub struct $resp {
                pub that: $crate::OrpcThat,
                $(pub $out_field: $out_ty,)*
                pub ret: i32,
            }

            impl ::std::convert::From<$op> for $resp {
                fn from(op: $op) -> Self {
                    Self {
                        that: op.that,
                        $($out_field: op.$out_field,)*
                        ret: op.ret,
                    }
                }
            }

            impl ::std::convert::From<$resp> for $op {
                fn from(resp: $resp) -> Self {
                    Self {
                        that: resp.that,
                        $($out_field: resp.$out_field,)*
                        ret: resp.ret,
                        ..::std::default::Default::default()
                    }
                }
            }
        )*

        impl $client {
            $(
                $(#[$meta])*
                pub async fn $method(
                    &self,
                    request: $req,
                    opts: $crate::CallOptions,
                ) -> $crate::CallResult<$resp> {
                    self.object().call(<$op>::from(request), opts).await
                }
            )*
        }

        /// Opnum and wire name of every operation
        pub const OPERATIONS: &[(u16, &str)] = &[$(($opnum, concat!("/", $iface, "/v0/", $wire))),*];
    };
}

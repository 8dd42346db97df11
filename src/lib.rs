// Performance
#![warn(clippy::clear_with_drain)]
#![warn(clippy::format_collect)]
#![warn(clippy::format_push_string)]
#![warn(clippy::inefficient_to_string)]
#![warn(clippy::inline_always)]
#![warn(clippy::iter_with_drain)]
#![warn(clippy::large_types_passed_by_value)]
#![deny(clippy::linkedlist)]
#![allow(clippy::manual_div_ceil)]
#![warn(clippy::mutex_atomic)]
#![warn(clippy::mutex_integer)]
#![warn(clippy::needless_collect)]
#![warn(clippy::needless_pass_by_value)]
#![warn(clippy::non_std_lazy_statics)]
#![warn(clippy::or_fun_call)]
#![warn(clippy::redundant_clone)]
#![warn(clippy::ref_option)]
#![warn(clippy::stable_sort_primitive)]
#![warn(clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::unnecessary_box_returns)]
#![warn(clippy::unnecessary_join)]
// Readability/Code Intention
#![warn(clippy::checked_conversions)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(clippy::cloned_instead_of_copied)]
#![warn(clippy::enum_glob_use)]
#![warn(clippy::equatable_if_let)]
#![warn(clippy::if_then_some_else_none)]
#![warn(clippy::implicit_clone)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::manual_assert)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::map_unwrap_or)]
#![warn(clippy::match_bool)]
#![warn(clippy::mod_module_files)]
#![warn(clippy::needless_continue)]
#![warn(clippy::needless_pass_by_ref_mut)]
#![warn(clippy::option_if_let_else)]
#![warn(clippy::range_minus_one)]
#![warn(clippy::range_plus_one)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(clippy::tests_outside_test_module)]
#![warn(clippy::unused_rounding)]
// Correctness/Safety
#![deny(clippy::cfg_not_test)]
#![warn(clippy::collection_is_never_read)]
#![warn(clippy::dbg_macro)]
#![deny(clippy::debug_assert_with_mut_call)]
#![deny(clippy::expl_impl_clone_on_copy)]
#![warn(clippy::large_stack_arrays)]
#![warn(clippy::large_stack_frames)]
#![warn(clippy::mem_forget)]
#![warn(clippy::mixed_read_write_in_expression)]
#![warn(clippy::mut_mut)]
#![deny(clippy::non_send_fields_in_send_ty)]
#![deny(clippy::significant_drop_in_scrutinee)]
#![warn(clippy::suspicious_operation_groupings)]
#![warn(clippy::undocumented_unsafe_blocks)]
#![warn(clippy::unwrap_used)]
// Annoyances
#![allow(clippy::needless_range_loop)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::uninlined_format_args)]

//! Multi-threaded RGBA8 resampling over caller-owned, strided pixel buffers.
//!
//! Small resizes run on the calling thread. Once source and destination
//! together exceed [`ResizeConfig::parallel_threshold`] pixels, the
//! destination is cut into row bands that are computed on their own threads
//! from shared, read-only weight tables. Both paths produce identical bytes.

pub mod buffer;
pub mod classify;
pub mod config;
pub mod error;
pub mod ffi;
pub mod filter;
pub mod request;
pub mod resizer;
pub mod surface;

#[cfg(feature = "bench")]
pub mod direct;
#[cfg(feature = "bench")]
pub mod executor;
#[cfg(feature = "bench")]
pub mod resample;
#[cfg(feature = "bench")]
pub mod sampler;

#[cfg(not(feature = "bench"))]
mod direct;
#[cfg(not(feature = "bench"))]
mod executor;
#[cfg(not(feature = "bench"))]
mod resample;
#[cfg(not(feature = "bench"))]
mod sampler;

pub use buffer::{
    DataType, Geometry, ImageView, ImageViewMut, PixelFormat, PixelLayout, scaled_dimensions,
};
pub use config::ResizeConfig;
pub use error::{BufferRole, ErrorKind, ResizeError};
pub use filter::FilterKind;
pub use request::{EdgeMode, ResizeRequest};
pub use resizer::Resizer;
pub use surface::{Surface, SurfaceMut};
use tracing::warn;

/// Resizes `src` into `dst` with the default configuration.
///
/// Returns `false` if the resize failed for any reason; the destination is
/// then in an unspecified state.
pub fn resize(src: ImageView<'_>, dst: ImageViewMut<'_>, filter: FilterKind) -> bool {
    match Resizer::default().resize(src, dst, filter) {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "resize failed");
            false
        }
    }
}

/// Resizes each source into the destination at the same index, with the
/// default configuration. Returns the number of pairs that succeeded.
pub fn resize_batch<S, D>(
    sources: &[S],
    destinations: &mut [D],
    filter: FilterKind,
) -> Result<usize, ResizeError>
where
    S: Surface,
    D: SurfaceMut,
{
    Resizer::default().resize_batch(sources, destinations, filter)
}

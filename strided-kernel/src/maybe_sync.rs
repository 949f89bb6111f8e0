//! Thread-safety bounds that follow the `parallel` feature.
//!
//! With `parallel` on, [`MaybeSync`] is [`Sync`] and [`MaybeSendSync`] is
//! [`Send`] + [`Sync`], which is what handing a closure or a shared input to
//! rayon requires. With `parallel` off nothing crosses a thread boundary, so
//! all three are blanket-implemented for every type.

#[cfg(feature = "parallel")]
mod imp {
    pub trait MaybeSend: Send {}
    impl<T: Send + ?Sized> MaybeSend for T {}

    pub trait MaybeSync: Sync {}
    impl<T: Sync + ?Sized> MaybeSync for T {}

    pub trait MaybeSendSync: Send + Sync {}
    impl<T: Send + Sync + ?Sized> MaybeSendSync for T {}
}

#[cfg(not(feature = "parallel"))]
mod imp {
    pub trait MaybeSend {}
    impl<T: ?Sized> MaybeSend for T {}

    pub trait MaybeSync {}
    impl<T: ?Sized> MaybeSync for T {}

    pub trait MaybeSendSync {}
    impl<T: ?Sized> MaybeSendSync for T {}
}

pub use imp::{MaybeSend, MaybeSendSync, MaybeSync};

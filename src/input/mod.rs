pub(crate) mod canvas;
pub(crate) mod device;
pub(crate) mod facade;
pub(crate) mod mouse;
pub(crate) mod property;

//! Repository implementations backed by `SeaORM`.

mod attachment;

pub use attachment::AttachmentRepository;

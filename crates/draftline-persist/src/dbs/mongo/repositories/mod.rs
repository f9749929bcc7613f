mod draft;
mod message;
mod thread;

pub use draft::MongoDraftRepository;
pub use message::MongoMessageRepository;
pub use thread::MongoThreadRepository;

mod memory_cache_store;
mod memory_locker;
mod redis_cache_store;
mod redis_locker;

pub use memory_cache_store::MemoryCacheStore;
pub use memory_locker::MemoryLocker;
pub use redis_cache_store::RedisCacheStore;
pub use redis_locker::RedisLocker;

//! Byte-counting strategies
//!
//! Each strategy partitions, distributes and combines the same computation
//! differently. Callers pick one through `StrategyType` and use it only
//! through the `ProcessingStrategy` trait.

pub mod fork_join;
pub mod map_reduce;
pub mod sequential;
pub mod task;
pub mod thread_pool;
pub mod traits;

pub use fork_join::ForkJoinStrategy;
pub use map_reduce::MapReduceStrategy;
pub use sequential::SequentialStrategy;
pub use task::TaskStrategy;
pub use thread_pool::ThreadPoolStrategy;
pub use traits::{ProcessingStrategy, StrategyType};

/// Instantiate the strategy registered under `strategy_type`
pub fn create_strategy(strategy_type: StrategyType) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sequential => Box::new(SequentialStrategy::new()),
        StrategyType::ThreadPool => Box::new(ThreadPoolStrategy::new()),
        StrategyType::Tasks => Box::new(TaskStrategy::new()),
        StrategyType::MapReduce => Box::new(MapReduceStrategy::new()),
        StrategyType::ForkJoin => Box::new(ForkJoinStrategy::new()),
    }
}

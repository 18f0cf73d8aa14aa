pub mod dispatcher;

pub use dispatcher::choose_queue;
pub use dispatcher::dispatch_pass;
pub use dispatcher::distance_to;
pub use dispatcher::find_best_elevator;
pub use dispatcher::Dispatcher;
pub use dispatcher::PassReport;

pub mod in_memory_ledger;
pub mod ledger_server;
pub mod ledger_state;
pub mod protocol;
pub mod unix_socket_ledger;

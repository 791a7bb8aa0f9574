pub mod acknowledgement;
pub mod client_status;
pub mod lite;
pub mod recv_packet;
pub mod send_packet;
pub mod timeout;
pub mod timeout_on_close;

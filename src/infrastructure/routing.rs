pub mod gateway_selector;

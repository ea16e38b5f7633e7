pub mod http_payment_gateway;

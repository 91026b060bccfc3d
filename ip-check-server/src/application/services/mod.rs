pub mod ip_check_service;

pub mod qr_record;

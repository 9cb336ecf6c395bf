pub mod emailjs_repository;
pub mod supabase;

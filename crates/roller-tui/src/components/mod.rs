pub mod log_panel;
pub mod roll_list;
pub mod roll_prompt;

/// Opening saved reaction diagrams in the system picture viewer
pub mod show_this_pic;

pub mod webforms;

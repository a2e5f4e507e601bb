#![cfg(test)]

mod common;
mod moderation;
mod submission;

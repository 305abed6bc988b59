mod attachments;
mod conversation;
mod embedding;
mod feedback;
mod helpers;
mod scrolling;

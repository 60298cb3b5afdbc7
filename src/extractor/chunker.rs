//! Word-aligned greedy text chunking

/// Target chunk size for RAG text chunks, in characters
pub const TEXT_CHUNK_SIZE: usize = 500;

/// Target window size for the code-detection pass; code patterns need larger
/// windows for multi-line matches
pub const CODE_CHUNK_SIZE: usize = 1000;

/// Split text into chunks of approximately `target_size` characters.
///
/// Chunk boundaries always fall between whitespace-separated words, never
/// inside one. Words are accumulated greedily; a chunk is closed when the
/// next word would push it past `target_size`. A single word longer than
/// `target_size` becomes its own chunk. Chunks join their words with single
/// spaces, preserving word order.
pub fn split_into_chunks(text: &str, target_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current_chunk: Vec<&str> = Vec::new();
    let mut current_size = 0;

    for word in text.split_whitespace() {
        if current_size + word.len() + 1 > target_size && !current_chunk.is_empty() {
            chunks.push(current_chunk.join(" "));
            current_size = word.len();
            current_chunk = vec![word];
        } else {
            current_size += word.len() + 1;
            current_chunk.push(word);
        }
    }

    if !current_chunk.is_empty() {
        chunks.push(current_chunk.join(" "));
    }

    chunks
}

mod test_transient_streams;

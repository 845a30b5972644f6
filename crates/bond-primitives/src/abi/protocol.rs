use alloy::sol;

sol! {
    #[derive(Debug, PartialEq, Eq)]
    interface IProtocol {
        function getNonce(address account) external view returns (uint256 nonce);

        function getFees(bytes calldata intentData) external view returns (uint256 fees);

        function submitIntent(bytes calldata intentData) external;
    }
}
